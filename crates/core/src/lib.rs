use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Kind of a ledger row.
///
/// Every row stores `tokens_deducted` as the amount removed from the balance:
/// positive values debit the user, negative values credit them. Deductions are
/// always positive, refunds always negative, and manual rows carry
/// `previous_balance - new_balance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deduction,
    Refund,
    Manual,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deduction => "deduction",
            TransactionType::Refund => "refund",
            TransactionType::Manual => "manual",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "deduction" => Ok(TransactionType::Deduction),
            "refund" => Ok(TransactionType::Refund),
            "manual" => Ok(TransactionType::Manual),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Amount to record on a manual row that moves a balance from `previous` to `next`.
pub fn manual_delta(previous: i64, next: i64) -> i64 {
    previous - next
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub user_id: String,
    pub balance: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTokenCost {
    pub id: String,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub tokens_required: i64,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTokenCostInput {
    pub model_id: String,
    pub tokens_required: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransaction {
    pub id: String,
    pub user_id: String,
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub tokens_deducted: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub balance_after: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub search: Option<String>,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_deductions: i64,
    pub total_refunds: i64,
    pub manual_adjustments: u64,
}

/// Result of a committed deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    pub tokens_deducted: i64,
    pub remaining_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiModel {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sport_id: Option<String>,
    pub betting_type_id: Option<String>,
    pub llm_provider_id: Option<String>,
    pub prompt_template: Option<String>,
    pub settings: Option<Value>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiModelInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sport_id: Option<String>,
    #[serde(default)]
    pub betting_type_id: Option<String>,
    #[serde(default)]
    pub llm_provider_id: Option<String>,
    #[serde(default)]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub settings: Option<Value>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmProvider {
    pub id: String,
    pub name: String,
    pub base_url: Option<String>,
    pub model_name: Option<String>,
    pub api_key: Option<String>,
    pub notes: Option<String>,
}

impl LlmProvider {
    /// Copy with the API key reduced to its last four characters.
    pub fn masked(&self) -> Self {
        let api_key = self.api_key.as_deref().map(mask_secret);
        Self {
            api_key,
            ..self.clone()
        }
    }
}

pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmProviderInput {
    pub name: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub sport_order: Option<i64>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportInput {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sport_order: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetType {
    pub id: String,
    pub name: String,
}

/// External odds / stats feed configured by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFeed {
    pub id: String,
    pub name: String,
    pub url: String,
    pub api_key: String,
    pub sport_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_name: Option<String>,
    pub is_active: bool,
    pub refresh_interval: i64,
    pub last_fetch: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ApiFeed {
    pub fn masked(&self) -> Self {
        Self {
            api_key: mask_secret(&self.api_key),
            ..self.clone()
        }
    }
}

pub const DEFAULT_FEED_REFRESH_SECS: i64 = 300;

fn default_refresh_interval() -> i64 {
    DEFAULT_FEED_REFRESH_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFeedInput {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub sport_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for ApiFeedInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            api_key: None,
            sport_id: None,
            is_active: true,
            refresh_interval: DEFAULT_FEED_REFRESH_SECS,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub model_name: String,
    pub analysis: String,
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub processed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerInputLog {
    pub id: String,
    pub user_id: String,
    pub model_id: String,
    pub input_type: String,
    pub input_text: String,
    pub response: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageTokens,
    ViewTransactions,
    ManageModels,
    ManageTaxonomy,
    ManageAdmins,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageTokens => "manage_tokens",
            Permission::ViewTransactions => "view_transactions",
            Permission::ManageModels => "manage_models",
            Permission::ManageTaxonomy => "manage_taxonomy",
            Permission::ManageAdmins => "manage_admins",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    Admin,
    ContentCreator,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::Admin => "admin",
            AdminRole::ContentCreator => "content_creator",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "Super Admin",
            AdminRole::Admin => "Admin",
            AdminRole::ContentCreator => "Content Creator",
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            AdminRole::SuperAdmin | AdminRole::Admin => &[
                Permission::ManageTokens,
                Permission::ViewTransactions,
                Permission::ManageModels,
                Permission::ManageTaxonomy,
                Permission::ManageAdmins,
            ],
            AdminRole::ContentCreator => &[Permission::ManageModels, Permission::ManageTaxonomy],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Super admins manage every role; admins only manage content creators.
    pub fn can_manage(&self, target: AdminRole) -> bool {
        match self {
            AdminRole::SuperAdmin => true,
            AdminRole::Admin => target == AdminRole::ContentCreator,
            AdminRole::ContentCreator => false,
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "admin" => Ok(AdminRole::Admin),
            "content_creator" => Ok(AdminRole::ContentCreator),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: String,
    pub user_id: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub assigned_by: Option<String>,
    pub assigned_at: String,
}

/// What an admin did, as recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    RoleAssigned,
    RoleUpdated,
    RoleRemoved,
    BalanceSet,
    BalanceGranted,
    BalanceDeleted,
    CostSaved,
    CostDeleted,
    ModelCreated,
    ModelUpdated,
    ModelDeleted,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::RoleAssigned => "role_assigned",
            ActivityAction::RoleUpdated => "role_updated",
            ActivityAction::RoleRemoved => "role_removed",
            ActivityAction::BalanceSet => "balance_set",
            ActivityAction::BalanceGranted => "balance_granted",
            ActivityAction::BalanceDeleted => "balance_deleted",
            ActivityAction::CostSaved => "cost_saved",
            ActivityAction::CostDeleted => "cost_deleted",
            ActivityAction::ModelCreated => "model_created",
            ActivityAction::ModelUpdated => "model_updated",
            ActivityAction::ModelDeleted => "model_deleted",
        }
    }

    /// Table the affected entity lives in.
    pub fn entity_type(&self) -> &'static str {
        match self {
            ActivityAction::RoleAssigned
            | ActivityAction::RoleUpdated
            | ActivityAction::RoleRemoved => "admin_role_assignment",
            ActivityAction::BalanceSet
            | ActivityAction::BalanceGranted
            | ActivityAction::BalanceDeleted => "user_tokens",
            ActivityAction::CostSaved | ActivityAction::CostDeleted => "model_token_settings",
            ActivityAction::ModelCreated
            | ActivityAction::ModelUpdated
            | ActivityAction::ModelDeleted => "ai_models",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let action = match value {
            "role_assigned" => ActivityAction::RoleAssigned,
            "role_updated" => ActivityAction::RoleUpdated,
            "role_removed" => ActivityAction::RoleRemoved,
            "balance_set" => ActivityAction::BalanceSet,
            "balance_granted" => ActivityAction::BalanceGranted,
            "balance_deleted" => ActivityAction::BalanceDeleted,
            "cost_saved" => ActivityAction::CostSaved,
            "cost_deleted" => ActivityAction::CostDeleted,
            "model_created" => ActivityAction::ModelCreated,
            "model_updated" => ActivityAction::ModelUpdated,
            "model_deleted" => ActivityAction::ModelDeleted,
            other => return Err(UnknownVariant(other.to_string())),
        };
        Ok(action)
    }
}

/// One row of the admin activity log. `user_id` is the acting admin and is
/// empty for changes made at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminActivity {
    pub id: String,
    pub user_id: Option<String>,
    pub action: ActivityAction,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_round_trips_through_str() {
        for kind in [
            TransactionType::Deduction,
            TransactionType::Refund,
            TransactionType::Manual,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionType>(), Ok(kind));
        }
        assert!("bonus".parse::<TransactionType>().is_err());
    }

    #[test]
    fn manual_delta_is_positive_for_debits() {
        assert_eq!(manual_delta(10, 4), 6);
        assert_eq!(manual_delta(0, 25), -25);
        assert_eq!(manual_delta(7, 7), 0);
    }

    #[test]
    fn admin_manages_only_content_creators() {
        assert!(AdminRole::Admin.can_manage(AdminRole::ContentCreator));
        assert!(!AdminRole::Admin.can_manage(AdminRole::Admin));
        assert!(!AdminRole::Admin.can_manage(AdminRole::SuperAdmin));
        assert!(AdminRole::SuperAdmin.can_manage(AdminRole::SuperAdmin));
        assert!(!AdminRole::ContentCreator.can_manage(AdminRole::ContentCreator));
    }

    #[test]
    fn content_creator_cannot_touch_tokens() {
        let role = AdminRole::ContentCreator;
        assert!(role.has_permission(Permission::ManageModels));
        assert!(!role.has_permission(Permission::ManageTokens));
        assert!(!role.has_permission(Permission::ViewTransactions));
    }

    #[test]
    fn provider_key_is_masked() {
        let provider = LlmProvider {
            id: "p1".to_string(),
            name: "OpenAI".to_string(),
            base_url: None,
            model_name: Some("gpt-4o".to_string()),
            api_key: Some("sk-abcdef123456".to_string()),
            notes: None,
        };
        let masked = provider.masked();
        assert_eq!(masked.api_key.as_deref(), Some("***********3456"));
        assert_eq!(mask_secret("abc"), "***");
    }

    #[test]
    fn feed_key_is_masked() {
        let feed = ApiFeed {
            id: "f1".to_string(),
            name: "Odds".to_string(),
            url: "https://odds.example/v4".to_string(),
            api_key: "odds-key-9876".to_string(),
            sport_id: None,
            sport_name: None,
            is_active: true,
            refresh_interval: DEFAULT_FEED_REFRESH_SECS,
            last_fetch: None,
            notes: None,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        };
        assert_eq!(feed.masked().api_key, "*********9876");
    }

    #[test]
    fn activity_actions_name_their_table() {
        assert_eq!(
            "role_removed".parse::<ActivityAction>(),
            Ok(ActivityAction::RoleRemoved)
        );
        assert_eq!(ActivityAction::BalanceSet.entity_type(), "user_tokens");
        assert_eq!(ActivityAction::ModelDeleted.entity_type(), "ai_models");
        assert!("role_moved".parse::<ActivityAction>().is_err());
    }

    #[test]
    fn transaction_serializes_type_field() {
        let tx = TokenTransaction {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            model_id: Some("m1".to_string()),
            model_name: None,
            tokens_deducted: 5,
            kind: TransactionType::Deduction,
            balance_after: Some(5),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&tx).expect("serialize");
        assert_eq!(value["type"], "deduction");
        assert!(value.get("model_name").is_none());
    }
}
