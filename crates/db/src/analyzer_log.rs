use betslip_core::AnalyzerInputLog;
use rusqlite::params;

use crate::error::Result;
use crate::helpers::{new_id, now_rfc3339, row_to_analyzer_input};
use crate::{Db, NewAnalyzerInput};

impl Db {
    pub fn insert_analyzer_input(&self, input: &NewAnalyzerInput<'_>) -> Result<String> {
        let id = new_id();
        self.conn.execute(
            r#"
            INSERT INTO analyzer_inputs (
              id, user_id, ai_model_id, input_type, input_text, response, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                id,
                input.user_id,
                input.model_id,
                input.input_type,
                input.input_text,
                input.response,
                now_rfc3339()
            ],
        )?;
        Ok(id)
    }

    pub fn list_analyzer_inputs(
        &self,
        user_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<AnalyzerInputLog>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, ai_model_id, input_type, input_text, response, created_at
            FROM analyzer_inputs
            WHERE (?1 IS NULL OR user_id = ?1)
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )?;
        let rows = stmt
            .query_map(params![user_id, limit], row_to_analyzer_input)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
