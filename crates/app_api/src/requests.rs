use betslip_core::{AiModelInput, ApiFeedInput, LlmProviderInput, SportInput};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Default)]
pub struct EmptyRequest {}

/// Body of `analyzer-with-tokens`. Ids are optional here so that a missing
/// field is reported as a validation error rather than a parse error.
#[derive(Debug, Deserialize, Default)]
pub struct AnalyzeRequest {
    pub user_id: Option<String>,
    pub model_id: Option<String>,
    #[serde(default)]
    pub input_data: Value,
}

#[derive(Debug, Deserialize, Default)]
pub struct DeductRequest {
    pub user_id: Option<String>,
    pub model_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct BalanceSetRequest {
    pub user_id: String,
    pub balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct BalanceGrantRequest {
    pub user_id: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct ModelsListRequest {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModelUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub model: AiModelInput,
}

#[derive(Debug, Deserialize)]
pub struct ProviderUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub provider: LlmProviderInput,
}

pub type SportCreateRequest = SportInput;

#[derive(Debug, Deserialize)]
pub struct SportUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub sport: SportInput,
}

#[derive(Debug, Deserialize)]
pub struct BetTypeCreateRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BetTypeUpdateRequest {
    pub id: String,
    pub name: String,
}

pub type FeedCreateRequest = ApiFeedInput;

#[derive(Debug, Deserialize)]
pub struct FeedUpdateRequest {
    pub id: String,
    #[serde(flatten)]
    pub feed: ApiFeedInput,
}

#[derive(Debug, Deserialize, Default)]
pub struct TransactionsListRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AnalyzerLogsRequest {
    pub user_id: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RolesListRequest {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoleAssignRequest {
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ActivityLogsRequest {
    #[serde(default)]
    pub limit: u32,
}
