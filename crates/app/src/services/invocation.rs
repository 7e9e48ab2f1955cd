use betslip_core::{AnalysisResult, Deduction};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::services::{AnalyzerService, LedgerService};

const MISSING_IDS: &str = "Missing user_id or model_id";

/// A paid analysis that went through.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationOutcome {
    pub result: AnalysisResult,
    pub tokens_used: i64,
    pub remaining_tokens: i64,
}

/// Token-gated entry points: charge first, then analyze, refunding the charge
/// when the analysis fails.
#[derive(Clone)]
pub struct InvocationService {
    ledger: LedgerService,
    analyzer: AnalyzerService,
}

impl InvocationService {
    pub(super) fn new(ledger: LedgerService, analyzer: AnalyzerService) -> Self {
        Self { ledger, analyzer }
    }

    pub fn analyze_with_tokens(
        &self,
        user_id: Option<&str>,
        model_id: Option<&str>,
        input: &Value,
    ) -> Result<InvocationOutcome> {
        let (user_id, model_id) = require_ids(user_id, model_id)?;
        tracing::info!(user_id, model_id, "checking tokens");
        let deduction = self.ledger.deduct(user_id, model_id)?;

        match self.analyzer.analyze(user_id, model_id, input) {
            Ok(result) => Ok(InvocationOutcome {
                result,
                tokens_used: deduction.tokens_deducted,
                remaining_tokens: deduction.remaining_balance,
            }),
            Err(err) => {
                tracing::warn!(
                    user_id,
                    model_id,
                    error = %err,
                    detail = err.detail().as_deref().unwrap_or(""),
                    "analysis failed after deduction"
                );
                self.compensate(user_id, model_id, &deduction);
                Err(err.into())
            }
        }
    }

    /// Charges the model's cost without running an analysis.
    pub fn deduct_only(&self, user_id: Option<&str>, model_id: Option<&str>) -> Result<Deduction> {
        let (user_id, model_id) = require_ids(user_id, model_id)?;
        Ok(self.ledger.deduct(user_id, model_id)?)
    }

    fn compensate(&self, user_id: &str, model_id: &str, deduction: &Deduction) {
        if let Err(err) = self
            .ledger
            .refund(user_id, Some(model_id), deduction.tokens_deducted)
        {
            tracing::error!(
                user_id,
                model_id,
                tokens = deduction.tokens_deducted,
                error = %err,
                "refund after failed analysis did not go through"
            );
        }
    }
}

fn require_ids<'a>(
    user_id: Option<&'a str>,
    model_id: Option<&'a str>,
) -> Result<(&'a str, &'a str)> {
    let user_id = user_id.map(str::trim).filter(|value| !value.is_empty());
    let model_id = model_id.map(str::trim).filter(|value| !value.is_empty());
    match (user_id, model_id) {
        (Some(user_id), Some(model_id)) => Ok((user_id, model_id)),
        _ => Err(AppError::InvalidInput(MISSING_IDS.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_missing() {
        assert!(require_ids(Some("u1"), Some("m1")).is_ok());
        for (user, model) in [(None, Some("m1")), (Some("u1"), None), (Some("  "), Some("m1"))] {
            let err = require_ids(user, model).unwrap_err();
            assert_eq!(err.to_string(), MISSING_IDS);
        }
    }
}
