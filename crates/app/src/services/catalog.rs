use betslip_core::{
    AiModel, AiModelInput, BetType, LlmProvider, LlmProviderInput, Sport, SportInput,
};
use betslip_db::Db;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, not_found, open_db, require_id};

/// Admin CRUD over models, providers and the sport / bet type taxonomy.
/// Provider API keys only ever leave this service masked.
#[derive(Clone)]
pub struct CatalogService {
    config: SharedConfig,
}

impl CatalogService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn list_models(&self, active_only: bool) -> Result<Vec<AiModel>> {
        let db = self.db()?;
        Ok(db.list_models(active_only)?)
    }

    pub fn create_model(&self, input: &AiModelInput) -> Result<AiModel> {
        let db = self.db()?;
        let input = validate_model(&db, input)?;
        let model = db.create_model(&input)?;
        tracing::info!(model_id = %model.id, name = %model.name, "model created");
        Ok(model)
    }

    pub fn update_model(&self, id: &str, input: &AiModelInput) -> Result<AiModel> {
        let db = self.db()?;
        let input = validate_model(&db, input)?;
        db.update_model(id, &input)?
            .ok_or_else(|| not_found("model", id))
    }

    pub fn delete_model(&self, id: &str) -> Result<()> {
        let db = self.db()?;
        if !db.delete_model(id)? {
            return Err(not_found("model", id));
        }
        tracing::info!(model_id = id, "model deleted");
        Ok(())
    }

    pub fn list_providers(&self) -> Result<Vec<LlmProvider>> {
        let db = self.db()?;
        Ok(db
            .list_providers()?
            .iter()
            .map(LlmProvider::masked)
            .collect())
    }

    pub fn create_provider(&self, input: &LlmProviderInput) -> Result<LlmProvider> {
        require_name(&input.name)?;
        let db = self.db()?;
        let provider = db.create_provider(&normalize_provider(input))?;
        Ok(provider.masked())
    }

    /// A blank or absent `api_key` keeps the stored key.
    pub fn update_provider(&self, id: &str, input: &LlmProviderInput) -> Result<LlmProvider> {
        require_name(&input.name)?;
        let db = self.db()?;
        let provider = db
            .update_provider(id, &normalize_provider(input))?
            .ok_or_else(|| not_found("provider", id))?;
        Ok(provider.masked())
    }

    pub fn delete_provider(&self, id: &str) -> Result<()> {
        let db = self.db()?;
        if !db.delete_provider(id)? {
            return Err(not_found("provider", id));
        }
        Ok(())
    }

    pub fn list_sports(&self) -> Result<Vec<Sport>> {
        let db = self.db()?;
        Ok(db.list_sports()?)
    }

    pub fn create_sport(&self, input: &SportInput) -> Result<Sport> {
        let name = require_name(&input.name)?;
        let db = self.db()?;
        Ok(db.create_sport(&SportInput {
            name: name.to_string(),
            ..input.clone()
        })?)
    }

    pub fn update_sport(&self, id: &str, input: &SportInput) -> Result<Sport> {
        let name = require_name(&input.name)?;
        let db = self.db()?;
        db.update_sport(
            id,
            &SportInput {
                name: name.to_string(),
                ..input.clone()
            },
        )?
        .ok_or_else(|| not_found("sport", id))
    }

    pub fn delete_sport(&self, id: &str) -> Result<()> {
        let db = self.db()?;
        if !db.delete_sport(id)? {
            return Err(not_found("sport", id));
        }
        Ok(())
    }

    pub fn list_bet_types(&self) -> Result<Vec<BetType>> {
        let db = self.db()?;
        Ok(db.list_bet_types()?)
    }

    pub fn create_bet_type(&self, name: &str) -> Result<BetType> {
        let name = require_name(name)?;
        let db = self.db()?;
        Ok(db.create_bet_type(name)?)
    }

    pub fn update_bet_type(&self, id: &str, name: &str) -> Result<BetType> {
        let name = require_name(name)?;
        let db = self.db()?;
        db.update_bet_type(id, name)?
            .ok_or_else(|| not_found("bet type", id))
    }

    pub fn delete_bet_type(&self, id: &str) -> Result<()> {
        let db = self.db()?;
        if !db.delete_bet_type(id)? {
            return Err(not_found("bet type", id));
        }
        Ok(())
    }
}

fn require_name(name: &str) -> Result<&str> {
    require_id(name, "name")
}

/// Checks the model's references and returns it with a trimmed name.
fn validate_model(db: &Db, input: &AiModelInput) -> Result<AiModelInput> {
    let name = require_name(&input.name)?;
    if let Some(sport_id) = input.sport_id.as_deref() {
        if db.get_sport(sport_id)?.is_none() {
            return Err(unknown_reference("sport_id", sport_id));
        }
    }
    if let Some(bet_type_id) = input.betting_type_id.as_deref() {
        if db.get_bet_type(bet_type_id)?.is_none() {
            return Err(unknown_reference("betting_type_id", bet_type_id));
        }
    }
    if let Some(provider_id) = input.llm_provider_id.as_deref() {
        if db.get_provider(provider_id)?.is_none() {
            return Err(unknown_reference("llm_provider_id", provider_id));
        }
    }
    Ok(AiModelInput {
        name: name.to_string(),
        ..input.clone()
    })
}

fn unknown_reference(field: &str, id: &str) -> AppError {
    AppError::InvalidInput(format!("{} {} does not exist", field, id))
}

fn normalize_provider(input: &LlmProviderInput) -> LlmProviderInput {
    LlmProviderInput {
        name: input.name.trim().to_string(),
        api_key: input
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string),
        ..input.clone()
    }
}
