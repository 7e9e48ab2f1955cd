use betslip_core::{ActivityAction, Deduction};
use serde_json::Value;

/// Outcome of a deduction attempt. Rejections leave the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductOutcome {
    Deducted(Deduction),
    CostMissing,
    InsufficientBalance,
}

/// Analyzer request/response pair to append to the input log.
#[derive(Debug, Clone)]
pub struct NewAnalyzerInput<'a> {
    pub user_id: &'a str,
    pub model_id: &'a str,
    pub input_type: &'a str,
    pub input_text: &'a str,
    pub response: Option<&'a str>,
}

/// Admin action to append to the activity log.
#[derive(Debug, Clone)]
pub struct NewActivity<'a> {
    pub user_id: Option<&'a str>,
    pub action: ActivityAction,
    pub entity_id: Option<&'a str>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
}
