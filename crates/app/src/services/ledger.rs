use betslip_core::{Deduction, TokenBalance};
use betslip_db::{Db, DeductOutcome};

use crate::error::{AppError, Result, TokenError};
use crate::services::{SharedConfig, not_found, open_db, require_id};

#[derive(Clone)]
pub struct LedgerService {
    config: SharedConfig,
}

impl LedgerService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Charges the model's token cost to the user. Rejections leave the
    /// balance untouched; any store failure surfaces as `PersistenceFailure`.
    pub fn deduct(&self, user_id: &str, model_id: &str) -> std::result::Result<Deduction, TokenError> {
        let outcome = Db::open(&self.config.db_path)
            .and_then(|mut db| db.deduct_tokens(user_id, model_id));
        match outcome {
            Ok(DeductOutcome::Deducted(deduction)) => {
                tracing::info!(
                    user_id,
                    model_id,
                    tokens = deduction.tokens_deducted,
                    remaining = deduction.remaining_balance,
                    "tokens deducted"
                );
                Ok(deduction)
            }
            Ok(DeductOutcome::CostMissing) => {
                tracing::info!(user_id, model_id, "no token cost configured for model");
                Err(TokenError::ConfigMissing)
            }
            Ok(DeductOutcome::InsufficientBalance) => {
                tracing::info!(user_id, model_id, "insufficient token balance");
                Err(TokenError::InsufficientBalance)
            }
            Err(err) => {
                tracing::error!(user_id, model_id, error = %err, "token deduction failed");
                Err(TokenError::PersistenceFailure(err))
            }
        }
    }

    /// Gives back tokens taken by an earlier deduction. Returns the new balance.
    pub fn refund(&self, user_id: &str, model_id: Option<&str>, tokens: i64) -> Result<i64> {
        let mut db = self.db()?;
        let balance = db.refund_tokens(user_id, model_id, tokens)?;
        tracing::warn!(user_id, ?model_id, tokens, balance, "tokens refunded");
        Ok(balance)
    }

    pub fn grant(&self, user_id: &str, amount: i64) -> Result<TokenBalance> {
        let user_id = require_id(user_id, "user_id")?;
        if amount <= 0 {
            return Err(AppError::InvalidInput(
                "amount must be a positive number of tokens".to_string(),
            ));
        }
        let mut db = self.db()?;
        let balance = db.grant_tokens(user_id, amount)?;
        tracing::info!(user_id, amount, balance, "tokens granted");
        self.load(&db, user_id)
    }

    /// Overwrites the balance. The change is recorded as a manual adjustment.
    pub fn set_balance(&self, user_id: &str, balance: i64) -> Result<TokenBalance> {
        let user_id = require_id(user_id, "user_id")?;
        if balance < 0 {
            return Err(AppError::InvalidInput(
                "balance must not be negative".to_string(),
            ));
        }
        let mut db = self.db()?;
        let previous = db.set_balance(user_id, balance)?;
        tracing::info!(user_id, previous, balance, "balance set");
        self.load(&db, user_id)
    }

    /// Removes the user's balance row. Returns the amount that was written off.
    pub fn delete_balance(&self, user_id: &str) -> Result<i64> {
        let user_id = require_id(user_id, "user_id")?;
        let mut db = self.db()?;
        let previous = db
            .delete_balance(user_id)?
            .ok_or_else(|| not_found("balance for user", user_id))?;
        tracing::info!(user_id, previous, "balance deleted");
        Ok(previous)
    }

    pub fn balance(&self, user_id: &str) -> Result<Option<TokenBalance>> {
        let db = self.db()?;
        Ok(db.get_balance(user_id)?)
    }

    pub fn list_balances(&self) -> Result<Vec<TokenBalance>> {
        let db = self.db()?;
        Ok(db.list_balances()?)
    }

    fn load(&self, db: &Db, user_id: &str) -> Result<TokenBalance> {
        db.get_balance(user_id)?
            .ok_or_else(|| not_found("balance for user", user_id))
    }
}
