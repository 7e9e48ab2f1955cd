use betslip_core::{ModelTokenCost, ModelTokenCostInput};
use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{new_id, now_rfc3339, row_to_cost};

const COST_SELECT: &str = r#"
    SELECT c.id, c.model_id, m.name, c.tokens_required, c.description, c.created_at, c.updated_at
    FROM model_token_settings c
    LEFT JOIN ai_models m ON m.id = c.model_id
"#;

impl Db {
    pub fn list_token_costs(&self) -> Result<Vec<ModelTokenCost>> {
        let sql = format!("{COST_SELECT} ORDER BY c.created_at DESC, c.id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_cost)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_token_cost_for_model(&self, model_id: &str) -> Result<Option<ModelTokenCost>> {
        let sql = format!("{COST_SELECT} WHERE c.model_id = ?1");
        self.conn
            .query_row(&sql, params![model_id], row_to_cost)
            .optional()
            .map_err(DbError::from)
    }

    /// Inserts or replaces the cost of one model (one row per model).
    pub fn upsert_token_cost(&self, input: &ModelTokenCostInput) -> Result<ModelTokenCost> {
        if input.tokens_required <= 0 {
            return Err(DbError::Constraint(format!(
                "tokens_required must be positive, got {}",
                input.tokens_required
            )));
        }
        let now = now_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO model_token_settings (
              id, model_id, tokens_required, description, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(model_id) DO UPDATE SET
              tokens_required = excluded.tokens_required,
              description = excluded.description,
              updated_at = excluded.updated_at
            "#,
            params![
                new_id(),
                input.model_id,
                input.tokens_required,
                input.description,
                now
            ],
        )?;
        self.get_token_cost_for_model(&input.model_id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn delete_token_cost(&self, id: &str) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM model_token_settings WHERE id = ?1",
            params![id],
        )?;
        Ok(deleted > 0)
    }
}
