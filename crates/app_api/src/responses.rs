use betslip_core::{AnalysisResult, Permission, RoleAssignment};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub result: AnalysisResult,
    pub tokens_used: i64,
    pub remaining_tokens: i64,
}

#[derive(Debug, Serialize)]
pub struct DeductResponse {
    pub success: bool,
    pub tokens_deducted: i64,
    pub remaining_balance: i64,
}

#[derive(Debug, Serialize)]
pub struct BalanceDeletedResponse {
    pub user_id: String,
    pub previous_balance: i64,
}

#[derive(Debug, Serialize)]
pub struct RoleMeResponse {
    pub assignment: RoleAssignment,
    pub display_name: &'static str,
    pub permissions: &'static [Permission],
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
