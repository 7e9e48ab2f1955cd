use betslip_core::{ModelTokenCost, ModelTokenCostInput};
use betslip_db::Db;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, not_found, open_db, require_id};

#[derive(Clone)]
pub struct CostsService {
    config: SharedConfig,
}

impl CostsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn list(&self) -> Result<Vec<ModelTokenCost>> {
        let db = self.db()?;
        Ok(db.list_token_costs()?)
    }

    /// Sets how many tokens one run of the model costs.
    pub fn put(&self, input: &ModelTokenCostInput) -> Result<ModelTokenCost> {
        let model_id = require_id(&input.model_id, "model_id")?;
        if input.tokens_required <= 0 {
            return Err(AppError::InvalidInput(
                "tokens_required must be greater than zero".to_string(),
            ));
        }
        let db = self.db()?;
        if db.get_model(model_id)?.is_none() {
            return Err(not_found("model", model_id));
        }
        let cost = db.upsert_token_cost(&ModelTokenCostInput {
            model_id: model_id.to_string(),
            tokens_required: input.tokens_required,
            description: input.description.clone(),
        })?;
        tracing::info!(model_id, tokens_required = cost.tokens_required, "token cost saved");
        Ok(cost)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let db = self.db()?;
        if !db.delete_token_cost(id)? {
            return Err(not_found("token cost", id));
        }
        Ok(())
    }
}
