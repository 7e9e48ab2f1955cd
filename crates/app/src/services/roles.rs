use betslip_core::{AdminRole, Permission, RoleAssignment};
use betslip_db::Db;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, not_found, open_db, rejected_by_store, require_id};

#[derive(Clone)]
pub struct RolesService {
    config: SharedConfig,
}

impl RolesService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Resolves the caller's active role.
    pub fn resolve(&self, user_id: Option<&str>) -> Result<RoleAssignment> {
        let user_id = user_id
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Unauthenticated("Authentication required".to_string()))?;
        let db = self.db()?;
        db.active_role(user_id)?.ok_or_else(|| {
            AppError::Forbidden("You do not have access to the admin area".to_string())
        })
    }

    pub fn list(&self, include_inactive: bool) -> Result<Vec<RoleAssignment>> {
        let db = self.db()?;
        Ok(db.list_role_assignments(include_inactive)?)
    }

    /// Gives `user_id` the role, replacing whatever role they held before.
    pub fn assign(
        &self,
        caller: &RoleAssignment,
        user_id: &str,
        role: AdminRole,
    ) -> Result<RoleAssignment> {
        require_permission(caller, Permission::ManageAdmins)?;
        let user_id = require_id(user_id, "user_id")?;
        let mut db = self.db()?;
        if let Some(current) = db.active_role(user_id)? {
            require_manage(caller, current.role)?;
        }
        require_manage(caller, role)?;
        let assignment = db
            .assign_role(user_id, role, Some(&caller.user_id))
            .map_err(rejected_by_store)?;
        tracing::info!(user_id, role = %role, by = %caller.user_id, "role assigned");
        Ok(assignment)
    }

    /// Deactivates an assignment. Callers cannot remove their own access.
    pub fn revoke(&self, caller: &RoleAssignment, assignment_id: &str) -> Result<RoleAssignment> {
        require_permission(caller, Permission::ManageAdmins)?;
        let mut db = self.db()?;
        let assignment = db
            .get_role_assignment(assignment_id)?
            .filter(|assignment| assignment.is_active)
            .ok_or_else(|| not_found("role assignment", assignment_id))?;
        require_manage(caller, assignment.role)?;
        if assignment.user_id == caller.user_id {
            return Err(AppError::InvalidInput(
                "cannot remove your own admin access".to_string(),
            ));
        }
        let revoked = db
            .revoke_role_assignment(assignment_id, &caller.user_id)
            .map_err(rejected_by_store)?
            .ok_or_else(|| not_found("role assignment", assignment_id))?;
        tracing::info!(
            user_id = %assignment.user_id,
            role = %assignment.role,
            by = %caller.user_id,
            "role revoked"
        );
        Ok(revoked)
    }

    /// Makes `user_id` a super admin when no active super admin exists.
    pub fn bootstrap_super_admin(&self, user_id: &str) -> Result<Option<RoleAssignment>> {
        let user_id = require_id(user_id, "bootstrap_super_admin")?;
        let mut db = self.db()?;
        if db.count_active_role(AdminRole::SuperAdmin)? > 0 {
            return Ok(None);
        }
        let assignment = db.assign_role(user_id, AdminRole::SuperAdmin, None)?;
        tracing::info!(user_id, "bootstrapped super admin");
        Ok(Some(assignment))
    }
}

pub fn require_permission(caller: &RoleAssignment, permission: Permission) -> Result<()> {
    if caller.role.has_permission(permission) {
        return Ok(());
    }
    Err(AppError::Forbidden(format!(
        "{} role lacks the {} permission",
        caller.role.display_name(),
        permission.as_str()
    )))
}

fn require_manage(caller: &RoleAssignment, target: AdminRole) -> Result<()> {
    if caller.role.can_manage(target) {
        return Ok(());
    }
    Err(AppError::Forbidden(format!(
        "{} cannot manage the {} role",
        caller.role.display_name(),
        target.display_name()
    )))
}
