use betslip_core::{TokenBalance, TransactionType, manual_delta};
use rusqlite::{OptionalExtension, TransactionBehavior, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{insert_transaction, now_rfc3339, row_to_balance};
use crate::ledger::load_balance;

impl Db {
    pub fn get_balance(&self, user_id: &str) -> Result<Option<TokenBalance>> {
        self.conn
            .query_row(
                "SELECT user_id, balance, updated_at FROM user_tokens WHERE user_id = ?1",
                params![user_id],
                row_to_balance,
            )
            .optional()
            .map_err(DbError::from)
    }

    pub fn list_balances(&self) -> Result<Vec<TokenBalance>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT user_id, balance, updated_at
            FROM user_tokens
            ORDER BY updated_at DESC, user_id ASC
            "#,
        )?;
        let rows = stmt
            .query_map([], row_to_balance)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Overwrites the balance and records the difference as a `manual` row.
    /// Returns the previous balance (zero when the user had no row).
    pub fn set_balance(&mut self, user_id: &str, balance: i64) -> Result<i64> {
        if balance < 0 {
            return Err(DbError::Constraint(format!(
                "balance must not be negative, got {}",
                balance
            )));
        }
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let previous = load_balance(&tx, user_id)?.unwrap_or(0);
        let now = now_rfc3339();
        tx.execute(
            r#"
            INSERT INTO user_tokens (user_id, balance, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
              balance = excluded.balance,
              updated_at = excluded.updated_at
            "#,
            params![user_id, balance, now],
        )?;
        insert_transaction(
            &tx,
            user_id,
            None,
            manual_delta(previous, balance),
            TransactionType::Manual,
            Some(balance),
            &now,
        )?;
        tx.commit()?;
        Ok(previous)
    }

    /// Removes the balance row. A non-zero balance is written off with a
    /// `manual` row. Returns the removed balance, if any.
    pub fn delete_balance(&mut self, user_id: &str) -> Result<Option<i64>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(previous) = load_balance(&tx, user_id)? else {
            return Ok(None);
        };
        tx.execute(
            "DELETE FROM user_tokens WHERE user_id = ?1",
            params![user_id],
        )?;
        if previous != 0 {
            insert_transaction(
                &tx,
                user_id,
                None,
                manual_delta(previous, 0),
                TransactionType::Manual,
                Some(0),
                &now_rfc3339(),
            )?;
        }
        tx.commit()?;
        Ok(Some(previous))
    }
}
