use betslip_core::{Deduction, TransactionType};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::error::{DbError, Result};
use crate::helpers::{insert_transaction, now_rfc3339};
use crate::{Db, DeductOutcome};

impl Db {
    /// Charges the model's configured cost against the user's balance.
    ///
    /// The balance check and the decrement are one conditional UPDATE inside an
    /// IMMEDIATE transaction, so concurrent callers serialize on the write lock
    /// and the balance can never go below zero. The `deduction` row is written
    /// in the same transaction.
    pub fn deduct_tokens(&mut self, user_id: &str, model_id: &str) -> Result<DeductOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(cost) = load_token_cost(&tx, model_id)? else {
            return Ok(DeductOutcome::CostMissing);
        };
        let now = now_rfc3339();
        let updated = tx.execute(
            r#"
            UPDATE user_tokens
            SET balance = balance - ?1, updated_at = ?2
            WHERE user_id = ?3 AND balance >= ?1
            "#,
            params![cost, now, user_id],
        )?;
        if updated == 0 {
            return Ok(DeductOutcome::InsufficientBalance);
        }
        let remaining = load_balance(&tx, user_id)?.unwrap_or(0);
        insert_transaction(
            &tx,
            user_id,
            Some(model_id),
            cost,
            TransactionType::Deduction,
            Some(remaining),
            &now,
        )?;
        tx.commit()?;
        Ok(DeductOutcome::Deducted(Deduction {
            tokens_deducted: cost,
            remaining_balance: remaining,
        }))
    }

    /// Returns `tokens` to the user and records a `refund` row. Returns the new balance.
    pub fn refund_tokens(
        &mut self,
        user_id: &str,
        model_id: Option<&str>,
        tokens: i64,
    ) -> Result<i64> {
        self.credit(user_id, model_id, tokens, TransactionType::Refund)
    }

    /// Adds `amount` tokens, creating the balance row if needed. Returns the new balance.
    pub fn grant_tokens(&mut self, user_id: &str, amount: i64) -> Result<i64> {
        self.credit(user_id, None, amount, TransactionType::Manual)
    }

    fn credit(
        &mut self,
        user_id: &str,
        model_id: Option<&str>,
        tokens: i64,
        kind: TransactionType,
    ) -> Result<i64> {
        if tokens <= 0 {
            return Err(DbError::Constraint(format!(
                "credit amount must be positive, got {}",
                tokens
            )));
        }
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = now_rfc3339();
        tx.execute(
            r#"
            INSERT INTO user_tokens (user_id, balance, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
              balance = balance + excluded.balance,
              updated_at = excluded.updated_at
            "#,
            params![user_id, tokens, now],
        )?;
        let balance = load_balance(&tx, user_id)?.unwrap_or(tokens);
        insert_transaction(&tx, user_id, model_id, -tokens, kind, Some(balance), &now)?;
        tx.commit()?;
        Ok(balance)
    }
}

pub(crate) fn load_token_cost(conn: &Connection, model_id: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT tokens_required FROM model_token_settings WHERE model_id = ?1",
        params![model_id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map_err(DbError::from)
}

pub(crate) fn load_balance(conn: &Connection, user_id: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT balance FROM user_tokens WHERE user_id = ?1",
        params![user_id],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .map_err(DbError::from)
}
