use betslip_db::DbError;
use serde::Serialize;
use thiserror::Error;

pub const INSUFFICIENT_TOKENS: &str = "insufficient_tokens";

/// Why a deduction was refused or could not be recorded.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token config missing for this model")]
    ConfigMissing,
    #[error(
        "You don't have enough tokens to run this analyzer. Please upgrade your plan or earn more tokens."
    )]
    InsufficientBalance,
    #[error("Token deduction failed")]
    PersistenceFailure(#[source] DbError),
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("AI model not found or inactive")]
    ModelUnavailable,
    #[error("Analysis failed")]
    Failed(String),
    #[error("Analysis failed")]
    Store(#[source] DbError),
}

impl AnalyzerError {
    /// Underlying reason, which the client-facing message leaves out.
    pub fn detail(&self) -> Option<String> {
        match self {
            AnalyzerError::ModelUnavailable => None,
            AnalyzerError::Failed(reason) => Some(reason.clone()),
            AnalyzerError::Store(err) => Some(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("db error: {0}")]
    Db(#[from] DbError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// JSON error body: `{"error": "...", "type": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ApiError {
    pub fn new(status: u16, error: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            status,
            error: error.into(),
            kind: kind.map(str::to_string),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, kind) = match &err {
            AppError::InvalidInput(_) => (400, None),
            AppError::Unauthenticated(_) => (401, Some("unauthenticated")),
            AppError::Forbidden(_) => (403, Some("forbidden")),
            AppError::NotFound(_) => (404, Some("not_found")),
            AppError::Token(TokenError::ConfigMissing | TokenError::InsufficientBalance) => {
                (402, Some(INSUFFICIENT_TOKENS))
            }
            AppError::Db(DbError::Constraint(_)) => (400, None),
            AppError::Db(db_err) if db_err.is_constraint_violation() => (409, Some("conflict")),
            AppError::Token(TokenError::PersistenceFailure(_))
            | AppError::Analyzer(_)
            | AppError::Db(_)
            | AppError::Io(_)
            | AppError::Serde(_)
            | AppError::Message(_) => (500, None),
        };
        Self::new(status, err.to_string(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_tokens_maps_to_payment_required() {
        let api = ApiError::from(AppError::Token(TokenError::InsufficientBalance));
        assert_eq!(api.status, 402);
        assert_eq!(api.kind.as_deref(), Some(INSUFFICIENT_TOKENS));

        let api = ApiError::from(AppError::Token(TokenError::ConfigMissing));
        assert_eq!(api.status, 402);
        assert_eq!(api.error, "Token config missing for this model");
    }

    #[test]
    fn analyzer_failure_is_internal() {
        let api = ApiError::from(AppError::Analyzer(AnalyzerError::ModelUnavailable));
        assert_eq!(api.status, 500);
        assert_eq!(api.error, "AI model not found or inactive");
        assert!(api.kind.is_none());
    }

    #[test]
    fn analyzer_detail_stays_out_of_the_message() {
        let err = AnalyzerError::Failed("provider timed out".to_string());
        assert_eq!(err.to_string(), "Analysis failed");
        assert_eq!(err.detail().as_deref(), Some("provider timed out"));
        assert_eq!(AnalyzerError::ModelUnavailable.detail(), None);
    }

    #[test]
    fn body_omits_missing_type() {
        let api = ApiError::from(AppError::InvalidInput(
            "Missing user_id or model_id".to_string(),
        ));
        let value = serde_json::to_value(&api).expect("serialize");
        assert_eq!(value, serde_json::json!({"error": "Missing user_id or model_id"}));
    }
}
