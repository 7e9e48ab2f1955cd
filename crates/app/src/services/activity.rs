use betslip_core::{ActivityAction, AdminActivity, RoleAssignment};
use betslip_db::{Db, NewActivity};
use serde_json::Value;

use crate::error::Result;
use crate::services::{SharedConfig, open_db};

pub const DEFAULT_ACTIVITY_LIMIT: u32 = 50;
const MAX_ACTIVITY_LIMIT: u32 = 500;

/// Admin activity log. Role changes are logged by the store inside their own
/// transaction; other admin edits go through `record`.
#[derive(Clone)]
pub struct ActivityService {
    config: SharedConfig,
}

impl ActivityService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Appends an entry for an edit that already succeeded. A failed write is
    /// logged and does not undo the edit.
    pub fn record(
        &self,
        caller: &RoleAssignment,
        action: ActivityAction,
        entity_id: &str,
        old_values: Option<Value>,
        new_values: Option<Value>,
    ) {
        let entry = NewActivity {
            user_id: Some(&caller.user_id),
            action,
            entity_id: Some(entity_id),
            old_values,
            new_values,
        };
        let written = self
            .db()
            .and_then(|db| Ok(db.record_activity(&entry)?));
        if let Err(err) = written {
            tracing::warn!(
                user_id = %caller.user_id,
                action = %action,
                entity_id,
                error = %err,
                "failed to record admin activity"
            );
        }
    }

    /// Newest first. `0` means the default page size.
    pub fn list(&self, limit: u32) -> Result<Vec<AdminActivity>> {
        let limit = match limit {
            0 => DEFAULT_ACTIVITY_LIMIT,
            value => value.min(MAX_ACTIVITY_LIMIT),
        };
        let db = self.db()?;
        Ok(db.list_activity(limit)?)
    }
}
