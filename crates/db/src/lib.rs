mod activity;
mod analyzer_log;
mod balances;
mod catalog;
mod costs;
mod error;
mod feeds;
mod helpers;
mod ledger;
mod migrations;
mod roles;
mod transactions;
mod types;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

pub use error::{DbError, Result};
pub use helpers::now_rfc3339;
pub use migrations::MIGRATIONS;
pub use roles::LAST_SUPER_ADMIN;
pub use types::{DeductOutcome, NewActivity, NewAnalyzerInput};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Db {
    conn: Connection,
}

impl Db {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }
}
