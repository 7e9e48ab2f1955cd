mod activity;
mod analyzer;
mod catalog;
mod costs;
mod feeds;
mod invocation;
mod ledger;
mod roles;
mod transactions;

use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::app::AppConfig;
use crate::error::{AppError, Result};
use betslip_db::{Db, DbError};

pub use activity::{ActivityService, DEFAULT_ACTIVITY_LIMIT};
pub use analyzer::AnalyzerService;
pub use catalog::CatalogService;
pub use costs::CostsService;
pub use feeds::FeedsService;
pub use invocation::{InvocationOutcome, InvocationService};
pub use ledger::LedgerService;
pub use roles::{RolesService, require_permission};
pub use transactions::{DEFAULT_TRANSACTION_LIMIT, TransactionsService};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub ledger: LedgerService,
    pub costs: CostsService,
    pub analyzer: AnalyzerService,
    pub invocation: InvocationService,
    pub catalog: CatalogService,
    pub feeds: FeedsService,
    pub transactions: TransactionsService,
    pub roles: RolesService,
    pub activity: ActivityService,
}

impl AppServices {
    pub fn new(config: &AppConfig, analyzer: Arc<dyn Analyzer>) -> Self {
        let shared = Arc::new(config.clone());
        let ledger = LedgerService::new(shared.clone());
        let analyzer = AnalyzerService::new(shared.clone(), analyzer);
        Self {
            invocation: InvocationService::new(ledger.clone(), analyzer.clone()),
            ledger,
            analyzer,
            costs: CostsService::new(shared.clone()),
            catalog: CatalogService::new(shared.clone()),
            feeds: FeedsService::new(shared.clone()),
            transactions: TransactionsService::new(shared.clone()),
            roles: RolesService::new(shared.clone()),
            activity: ActivityService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

fn require_id<'a>(value: &'a str, field: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", field)));
    }
    Ok(value)
}

fn not_found(what: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} {} not found", what, id))
}

/// Store-side validation failures are the caller's fault.
fn rejected_by_store(err: DbError) -> AppError {
    match err {
        DbError::Constraint(message) => AppError::InvalidInput(message),
        other => AppError::Db(other),
    }
}
