use betslip_core::{
    AiModel, AiModelInput, BetType, LlmProvider, LlmProviderInput, Sport, SportInput,
};
use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{
    MODEL_COLUMNS, new_id, now_rfc3339, row_to_bet_type, row_to_model, row_to_provider,
    row_to_sport,
};

const PROVIDER_COLUMNS: &str = "id, name, base_url, model_name, api_key, notes";
const SPORT_COLUMNS: &str =
    "id, name, icon, description, sport_order, is_active, created_at, updated_at";

fn settings_text(input: &AiModelInput) -> Result<Option<String>> {
    Ok(input
        .settings
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?)
}

impl Db {
    pub fn list_models(&self, active_only: bool) -> Result<Vec<AiModel>> {
        let sql = format!(
            "SELECT {MODEL_COLUMNS} FROM ai_models WHERE (?1 = 0 OR is_active = 1) ORDER BY name ASC, id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![active_only], row_to_model)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_model(&self, id: &str) -> Result<Option<AiModel>> {
        let sql = format!("SELECT {MODEL_COLUMNS} FROM ai_models WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_model)
            .optional()
            .map_err(DbError::from)
    }

    /// Loads an active model together with its provider, if one is linked.
    pub fn get_active_model_with_provider(
        &self,
        id: &str,
    ) -> Result<Option<(AiModel, Option<LlmProvider>)>> {
        let Some(model) = self.get_model(id)? else {
            return Ok(None);
        };
        if !model.is_active {
            return Ok(None);
        }
        let provider = match model.llm_provider_id.as_deref() {
            Some(provider_id) => self.get_provider(provider_id)?,
            None => None,
        };
        Ok(Some((model, provider)))
    }

    pub fn create_model(&self, input: &AiModelInput) -> Result<AiModel> {
        let id = new_id();
        let now = now_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO ai_models (
              id, name, description, sport_id, betting_type_id, llm_provider_id,
              prompt_template, settings, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
            params![
                id,
                input.name,
                input.description,
                input.sport_id,
                input.betting_type_id,
                input.llm_provider_id,
                input.prompt_template,
                settings_text(input)?,
                input.is_active,
                now
            ],
        )?;
        self.get_model(&id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn update_model(&self, id: &str, input: &AiModelInput) -> Result<Option<AiModel>> {
        let updated = self.conn.execute(
            r#"
            UPDATE ai_models SET
              name = ?2,
              description = ?3,
              sport_id = ?4,
              betting_type_id = ?5,
              llm_provider_id = ?6,
              prompt_template = ?7,
              settings = ?8,
              is_active = ?9,
              updated_at = ?10
            WHERE id = ?1
            "#,
            params![
                id,
                input.name,
                input.description,
                input.sport_id,
                input.betting_type_id,
                input.llm_provider_id,
                input.prompt_template,
                settings_text(input)?,
                input.is_active,
                now_rfc3339()
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_model(id)
    }

    pub fn delete_model(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM ai_models WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn list_providers(&self) -> Result<Vec<LlmProvider>> {
        let sql = format!("SELECT {PROVIDER_COLUMNS} FROM llm_providers ORDER BY name ASC, id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_provider)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_provider(&self, id: &str) -> Result<Option<LlmProvider>> {
        let sql = format!("SELECT {PROVIDER_COLUMNS} FROM llm_providers WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_provider)
            .optional()
            .map_err(DbError::from)
    }

    pub fn create_provider(&self, input: &LlmProviderInput) -> Result<LlmProvider> {
        let id = new_id();
        self.conn.execute(
            r#"
            INSERT INTO llm_providers (id, name, base_url, model_name, api_key, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                input.name,
                input.base_url,
                input.model_name,
                input.api_key,
                input.notes
            ],
        )?;
        self.get_provider(&id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Updates a provider. A missing `api_key` keeps the stored key so that
    /// callers holding only the masked value do not erase it.
    pub fn update_provider(
        &self,
        id: &str,
        input: &LlmProviderInput,
    ) -> Result<Option<LlmProvider>> {
        let updated = self.conn.execute(
            r#"
            UPDATE llm_providers SET
              name = ?2,
              base_url = ?3,
              model_name = ?4,
              api_key = COALESCE(?5, api_key),
              notes = ?6
            WHERE id = ?1
            "#,
            params![
                id,
                input.name,
                input.base_url,
                input.model_name,
                input.api_key,
                input.notes
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_provider(id)
    }

    pub fn delete_provider(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM llm_providers WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn list_sports(&self) -> Result<Vec<Sport>> {
        let sql = format!(
            "SELECT {SPORT_COLUMNS} FROM sports ORDER BY sport_order IS NULL, sport_order ASC, name ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_sport)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn create_sport(&self, input: &SportInput) -> Result<Sport> {
        let id = new_id();
        let now = now_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO sports (
              id, name, icon, description, sport_order, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            "#,
            params![
                id,
                input.name,
                input.icon,
                input.description,
                input.sport_order,
                input.is_active,
                now
            ],
        )?;
        self.get_sport(&id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_sport(&self, id: &str) -> Result<Option<Sport>> {
        let sql = format!("SELECT {SPORT_COLUMNS} FROM sports WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_sport)
            .optional()
            .map_err(DbError::from)
    }

    pub fn update_sport(&self, id: &str, input: &SportInput) -> Result<Option<Sport>> {
        let updated = self.conn.execute(
            r#"
            UPDATE sports SET
              name = ?2,
              icon = ?3,
              description = ?4,
              sport_order = ?5,
              is_active = ?6,
              updated_at = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                input.name,
                input.icon,
                input.description,
                input.sport_order,
                input.is_active,
                now_rfc3339()
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_sport(id)
    }

    pub fn delete_sport(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM sports WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn list_bet_types(&self) -> Result<Vec<BetType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM betting_types ORDER BY name ASC")?;
        let rows = stmt
            .query_map([], row_to_bet_type)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_bet_type(&self, id: &str) -> Result<Option<BetType>> {
        self.conn
            .query_row(
                "SELECT id, name FROM betting_types WHERE id = ?1",
                params![id],
                row_to_bet_type,
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn create_bet_type(&self, name: &str) -> Result<BetType> {
        let id = new_id();
        self.conn.execute(
            "INSERT INTO betting_types (id, name) VALUES (?1, ?2)",
            params![id, name],
        )?;
        Ok(BetType {
            id,
            name: name.to_string(),
        })
    }

    pub fn update_bet_type(&self, id: &str, name: &str) -> Result<Option<BetType>> {
        let updated = self.conn.execute(
            "UPDATE betting_types SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_bet_type(id)
    }

    pub fn delete_bet_type(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM betting_types WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
