use betslip_core::{TokenTransaction, TransactionFilter, TransactionSummary};
use betslip_db::Db;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};

pub const DEFAULT_TRANSACTION_LIMIT: u32 = 500;
pub const MAX_TRANSACTION_LIMIT: u32 = 5000;

#[derive(Clone)]
pub struct TransactionsService {
    config: SharedConfig,
}

impl TransactionsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// A zero limit means the default; larger limits are capped.
    pub fn list(&self, filter: &TransactionFilter) -> Result<Vec<TokenTransaction>> {
        let limit = match filter.limit {
            0 => DEFAULT_TRANSACTION_LIMIT,
            limit => limit.min(MAX_TRANSACTION_LIMIT),
        };
        let db = self.db()?;
        Ok(db.list_transactions(&TransactionFilter {
            limit,
            ..filter.clone()
        })?)
    }

    pub fn for_user(&self, user_id: &str) -> Result<Vec<TokenTransaction>> {
        let db = self.db()?;
        Ok(db.list_user_transactions(user_id)?)
    }

    pub fn summary(&self) -> Result<TransactionSummary> {
        let db = self.db()?;
        Ok(db.transaction_summary()?)
    }
}
