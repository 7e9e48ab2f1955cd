use std::sync::Arc;

use betslip_core::{AnalysisResult, AnalyzerInputLog};
use betslip_db::{Db, NewAnalyzerInput};
use serde_json::Value;

use crate::analyzer::{AnalysisRequest, Analyzer};
use crate::error::{AnalyzerError, Result};
use crate::services::{SharedConfig, open_db};

const INPUT_TYPE_TEXT: &str = "text";

#[derive(Clone)]
pub struct AnalyzerService {
    config: SharedConfig,
    analyzer: Arc<dyn Analyzer>,
}

impl AnalyzerService {
    pub(super) fn new(config: SharedConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        Self { config, analyzer }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Runs the active model over `input` and appends the pair to the input log.
    /// The call does not touch token balances.
    pub fn analyze(
        &self,
        user_id: &str,
        model_id: &str,
        input: &Value,
    ) -> std::result::Result<AnalysisResult, AnalyzerError> {
        let db = Db::open(&self.config.db_path).map_err(AnalyzerError::Store)?;
        let (model, provider) = db
            .get_active_model_with_provider(model_id)
            .map_err(AnalyzerError::Store)?
            .ok_or(AnalyzerError::ModelUnavailable)?;
        let result = self.analyzer.analyze(&AnalysisRequest {
            user_id,
            model: &model,
            provider: provider.as_ref(),
            input,
        })?;
        if let Err(err) = log_input(&db, user_id, model_id, input, &result) {
            tracing::warn!(user_id, model_id, error = %err, "failed to record analyzer input");
        }
        Ok(result)
    }

    pub fn list_logs(&self, user_id: Option<&str>, limit: u32) -> Result<Vec<AnalyzerInputLog>> {
        let db = self.db()?;
        Ok(db.list_analyzer_inputs(user_id, limit)?)
    }
}

fn log_input(
    db: &Db,
    user_id: &str,
    model_id: &str,
    input: &Value,
    result: &AnalysisResult,
) -> Result<()> {
    let input_text = serde_json::to_string(input)?;
    let response = serde_json::to_string(result)?;
    db.insert_analyzer_input(&NewAnalyzerInput {
        user_id,
        model_id,
        input_type: INPUT_TYPE_TEXT,
        input_text: &input_text,
        response: Some(&response),
    })?;
    Ok(())
}
