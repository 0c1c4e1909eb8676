//! Role and operation lookups
//!
//! Every method here is a pure read of the index. Unknown entities, unknown
//! roles and the wildcard operation simply produce `false` or an empty result.

use super::types::{EntityPermissions, OperationSlot, PermissionIndex, RolePermission};
use crate::policy::Policy;
use crate::types::Operation;

impl PermissionIndex {
    fn slot(&self, entity: &str, operation: Operation) -> Option<(&EntityPermissions, &OperationSlot)> {
        let entity = self.entity(entity)?;
        let slot = entity.slot(operation)?;
        Some((entity, slot))
    }

    /// Permission of `role` for `operation` on `entity`, if declared
    pub fn permission(&self, entity: &str, role: &str, operation: Operation) -> Option<&RolePermission> {
        let (_, slot) = self.slot(entity, operation)?;
        let role = self.role_id(role)?;
        slot.get(&role)
    }

    /// Whether `role` (case-insensitive) may perform `operation` on `entity`
    pub fn is_defined(&self, entity: &str, role: &str, operation: Operation) -> bool {
        self.permission(entity, role, operation).is_some()
    }

    /// Every role that may perform `operation` on `entity`
    ///
    /// Roles come back spelled and ordered as `entity` declares them; an
    /// inherited `authenticated` comes last.
    pub fn roles_for(&self, entity: &str, operation: Operation) -> Vec<&str> {
        match self.slot(entity, operation) {
            Some((entity, slot)) => entity.granted(slot).map(|(role, _)| role).collect(),
            None => Vec::new(),
        }
    }

    /// Roles that may perform `operation` on `field` of `entity`
    pub fn roles_for_field(&self, entity: &str, field: &str, operation: Operation) -> Vec<&str> {
        let Some((entity, slot)) = self.slot(entity, operation) else {
            return Vec::new();
        };
        if !entity.columns.contains(field) {
            return Vec::new();
        }

        entity
            .granted(slot)
            .filter(|(_, permission)| permission.fields.allows(field))
            .map(|(role, _)| role)
            .collect()
    }

    /// Policy declared for `role` and `operation` on `entity`
    ///
    /// Returns `None` both when the role has no such permission and when the
    /// permission carries no predicate.
    pub fn policy(&self, entity: &str, role: &str, operation: Operation) -> Option<&Policy> {
        self.permission(entity, role, operation)
            .map(|permission| &permission.policy)
            .filter(|policy| !policy.is_empty())
    }
}
