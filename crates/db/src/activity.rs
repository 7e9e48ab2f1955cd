use betslip_core::AdminActivity;
use rusqlite::{Connection, params};
use serde_json::Value;

use crate::error::Result;
use crate::helpers::{new_id, now_rfc3339, row_to_activity};
use crate::{Db, NewActivity};

impl Db {
    pub fn record_activity(&self, entry: &NewActivity<'_>) -> Result<String> {
        insert_activity(&self.conn, entry)
    }

    /// Newest first.
    pub fn list_activity(&self, limit: u32) -> Result<Vec<AdminActivity>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, action, entity_type, entity_id, old_values, new_values, created_at
            FROM admin_activity_logs
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![limit], row_to_activity)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Appends one activity row on `conn`, which may be an open transaction.
pub(crate) fn insert_activity(conn: &Connection, entry: &NewActivity<'_>) -> Result<String> {
    let id = new_id();
    conn.execute(
        r#"
        INSERT INTO admin_activity_logs (
          id, user_id, action, entity_type, entity_id, old_values, new_values, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            id,
            entry.user_id,
            entry.action.as_str(),
            entry.action.entity_type(),
            entry.entity_id,
            json_text(entry.old_values.as_ref())?,
            json_text(entry.new_values.as_ref())?,
            now_rfc3339()
        ],
    )?;
    Ok(id)
}

fn json_text(value: Option<&Value>) -> Result<Option<String>> {
    Ok(value.map(serde_json::to_string).transpose()?)
}
