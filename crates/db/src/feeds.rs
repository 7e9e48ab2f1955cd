use betslip_core::{ApiFeed, ApiFeedInput};
use rusqlite::{OptionalExtension, params};

use crate::Db;
use crate::error::{DbError, Result};
use crate::helpers::{new_id, now_rfc3339, row_to_feed};

const FEED_SELECT: &str = r#"
    SELECT f.id, f.name, f.url, f.api_key, f.sport_id, f.is_active, f.refresh_interval,
           f.last_fetch, f.notes, f.created_at, f.updated_at, s.name
    FROM api_feeds f
    LEFT JOIN sports s ON s.id = f.sport_id
"#;

impl Db {
    pub fn list_feeds(&self) -> Result<Vec<ApiFeed>> {
        let sql = format!("{FEED_SELECT} ORDER BY f.name ASC, f.id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_feed)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_feed(&self, id: &str) -> Result<Option<ApiFeed>> {
        let sql = format!("{FEED_SELECT} WHERE f.id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_feed)
            .optional()
            .map_err(DbError::from)
    }

    pub fn create_feed(&self, input: &ApiFeedInput) -> Result<ApiFeed> {
        let Some(api_key) = input.api_key.as_deref() else {
            return Err(DbError::Constraint("api_key is required".to_string()));
        };
        let id = new_id();
        self.conn.execute(
            r#"
            INSERT INTO api_feeds (
              id, name, url, api_key, sport_id, is_active, refresh_interval, notes,
              created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
            params![
                id,
                input.name,
                input.url,
                api_key,
                input.sport_id,
                input.is_active,
                input.refresh_interval,
                input.notes,
                now_rfc3339()
            ],
        )?;
        self.get_feed(&id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// A missing `api_key` keeps the stored key.
    pub fn update_feed(&self, id: &str, input: &ApiFeedInput) -> Result<Option<ApiFeed>> {
        let updated = self.conn.execute(
            r#"
            UPDATE api_feeds SET
              name = ?2,
              url = ?3,
              api_key = COALESCE(?4, api_key),
              sport_id = ?5,
              is_active = ?6,
              refresh_interval = ?7,
              notes = ?8,
              updated_at = ?9
            WHERE id = ?1
            "#,
            params![
                id,
                input.name,
                input.url,
                input.api_key,
                input.sport_id,
                input.is_active,
                input.refresh_interval,
                input.notes,
                now_rfc3339()
            ],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_feed(id)
    }

    pub fn delete_feed(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM api_feeds WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
