pub mod analyzer;
pub mod app;
pub mod error;
pub mod services;
pub mod startup;

pub use analyzer::{AnalysisRequest, Analyzer, StubAnalyzer};
pub use app::{AppConfig, AppState};
pub use error::{AnalyzerError, ApiError, AppError, Result, TokenError};
pub use services::{
    AppServices, DEFAULT_ACTIVITY_LIMIT, DEFAULT_TRANSACTION_LIMIT, InvocationOutcome,
    require_permission,
};
pub use startup::{AppPaths, ensure_app_data_dir};
