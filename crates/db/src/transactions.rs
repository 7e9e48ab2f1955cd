use betslip_core::{TokenTransaction, TransactionFilter, TransactionSummary};
use rusqlite::params;

use crate::Db;
use crate::error::Result;
use crate::helpers::row_to_transaction;

impl Db {
    /// Newest first. `search` matches the user id or the model name,
    /// case-insensitively.
    pub fn list_transactions(&self, filter: &TransactionFilter) -> Result<Vec<TokenTransaction>> {
        let kind = filter.kind.map(|kind| kind.as_str());
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| format!("%{}%", escape_like(&value.to_lowercase())));
        let mut stmt = self.conn.prepare(
            r#"
            SELECT t.id, t.user_id, t.model_id, m.name, t.tokens_deducted, t.type,
                   t.balance_after, t.created_at
            FROM token_transactions t
            LEFT JOIN ai_models m ON m.id = t.model_id
            WHERE (?1 IS NULL OR t.type = ?1)
              AND (
                ?2 IS NULL
                OR lower(t.user_id) LIKE ?2 ESCAPE '\'
                OR lower(m.name) LIKE ?2 ESCAPE '\'
              )
            ORDER BY t.created_at DESC, t.rowid DESC
            LIMIT ?3
            "#,
        )?;
        let rows = stmt
            .query_map(params![kind, search, filter.limit], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_user_transactions(&self, user_id: &str) -> Result<Vec<TokenTransaction>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT t.id, t.user_id, t.model_id, m.name, t.tokens_deducted, t.type,
                   t.balance_after, t.created_at
            FROM token_transactions t
            LEFT JOIN ai_models m ON m.id = t.model_id
            WHERE t.user_id = ?1
            ORDER BY t.created_at ASC, t.rowid ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![user_id], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Refund totals are reported as positive token counts.
    pub fn transaction_summary(&self) -> Result<TransactionSummary> {
        let summary = self.conn.query_row(
            r#"
            SELECT
              COALESCE(SUM(CASE WHEN type = 'deduction' THEN tokens_deducted END), 0),
              COALESCE(SUM(CASE WHEN type = 'refund' THEN -tokens_deducted END), 0),
              COUNT(CASE WHEN type = 'manual' THEN 1 END)
            FROM token_transactions
            "#,
            [],
            |row| {
                Ok(TransactionSummary {
                    total_deductions: row.get(0)?,
                    total_refunds: row.get(1)?,
                    manual_adjustments: row.get::<_, i64>(2)?.max(0) as u64,
                })
            },
        )?;
        Ok(summary)
    }
}

/// Makes `%`, `_` and the escape character itself match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
