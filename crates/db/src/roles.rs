use betslip_core::{ActivityAction, AdminRole, RoleAssignment};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde_json::json;

use crate::activity::insert_activity;
use crate::error::{DbError, Result};
use crate::helpers::{new_id, now_rfc3339, row_to_role_assignment};
use crate::{Db, NewActivity};

pub const LAST_SUPER_ADMIN: &str = "cannot remove the last super admin";

const ROLE_COLUMNS: &str = "id, user_id, role, is_active, assigned_by, assigned_at";

impl Db {
    /// Most recent active assignment for the user.
    pub fn active_role(&self, user_id: &str) -> Result<Option<RoleAssignment>> {
        load_active_role(&self.conn, user_id)
    }

    pub fn get_role_assignment(&self, id: &str) -> Result<Option<RoleAssignment>> {
        let sql = format!("SELECT {ROLE_COLUMNS} FROM admin_role_assignments WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_role_assignment)
            .optional()
            .map_err(DbError::from)
    }

    pub fn list_role_assignments(&self, include_inactive: bool) -> Result<Vec<RoleAssignment>> {
        let sql = format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM admin_role_assignments
            WHERE (?1 = 1 OR is_active = 1)
            ORDER BY assigned_at DESC, rowid DESC
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![include_inactive], row_to_role_assignment)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Gives the user `role`, deactivating any assignment they already hold.
    /// Demoting the only active super admin is refused. The change and its
    /// activity row commit together.
    pub fn assign_role(
        &mut self,
        user_id: &str,
        role: AdminRole,
        assigned_by: Option<&str>,
    ) -> Result<RoleAssignment> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = load_active_role(&tx, user_id)?;
        if let Some(current) = &current {
            if current.role == AdminRole::SuperAdmin && role != AdminRole::SuperAdmin {
                ensure_other_super_admin(&tx)?;
            }
        }
        tx.execute(
            "UPDATE admin_role_assignments SET is_active = 0 WHERE user_id = ?1 AND is_active = 1",
            params![user_id],
        )?;
        let id = new_id();
        tx.execute(
            r#"
            INSERT INTO admin_role_assignments (id, user_id, role, is_active, assigned_by, assigned_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?5)
            "#,
            params![id, user_id, role.as_str(), assigned_by, now_rfc3339()],
        )?;
        let (action, old_values) = match &current {
            Some(current) => (
                ActivityAction::RoleUpdated,
                Some(json!({"role": current.role})),
            ),
            None => (ActivityAction::RoleAssigned, None),
        };
        insert_activity(
            &tx,
            &NewActivity {
                user_id: assigned_by,
                action,
                entity_id: Some(&id),
                old_values,
                new_values: Some(json!({"user_id": user_id, "role": role})),
            },
        )?;
        tx.commit()?;
        self.get_role_assignment(&id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Deactivates an active assignment. Returns `None` when there is no
    /// active assignment with that id. The last active super admin is kept:
    /// the count and the update share one IMMEDIATE transaction.
    pub fn revoke_role_assignment(
        &mut self,
        id: &str,
        revoked_by: &str,
    ) -> Result<Option<RoleAssignment>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let sql = format!(
            "SELECT {ROLE_COLUMNS} FROM admin_role_assignments WHERE id = ?1 AND is_active = 1"
        );
        let Some(assignment) = tx
            .query_row(&sql, params![id], row_to_role_assignment)
            .optional()?
        else {
            return Ok(None);
        };
        if assignment.role == AdminRole::SuperAdmin {
            ensure_other_super_admin(&tx)?;
        }
        tx.execute(
            "UPDATE admin_role_assignments SET is_active = 0 WHERE id = ?1",
            params![id],
        )?;
        insert_activity(
            &tx,
            &NewActivity {
                user_id: Some(revoked_by),
                action: ActivityAction::RoleRemoved,
                entity_id: Some(id),
                old_values: Some(json!({"role": assignment.role, "is_active": true})),
                new_values: Some(json!({"is_active": false})),
            },
        )?;
        tx.commit()?;
        Ok(Some(RoleAssignment {
            is_active: false,
            ..assignment
        }))
    }

    pub fn count_active_role(&self, role: AdminRole) -> Result<u64> {
        count_active(&self.conn, role)
    }
}

fn load_active_role(conn: &Connection, user_id: &str) -> Result<Option<RoleAssignment>> {
    let sql = format!(
        r#"
        SELECT {ROLE_COLUMNS}
        FROM admin_role_assignments
        WHERE user_id = ?1 AND is_active = 1
        ORDER BY assigned_at DESC, rowid DESC
        LIMIT 1
        "#
    );
    conn.query_row(&sql, params![user_id], row_to_role_assignment)
        .optional()
        .map_err(DbError::from)
}

fn count_active(conn: &Connection, role: AdminRole) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM admin_role_assignments WHERE role = ?1 AND is_active = 1",
        params![role.as_str()],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as u64)
}

fn ensure_other_super_admin(conn: &Connection) -> Result<()> {
    if count_active(conn, AdminRole::SuperAdmin)? <= 1 {
        return Err(DbError::Constraint(LAST_SUPER_ADMIN.to_string()));
    }
    Ok(())
}
