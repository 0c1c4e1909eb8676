//! Column access evaluation

use super::types::PermissionIndex;
use crate::types::Operation;

impl PermissionIndex {
    /// Whether every field in `fields` is accessible to `role` for `operation`
    ///
    /// Per field: unknown columns are denied, then exclusion (literal or
    /// wildcard) denies, then inclusion (literal or wildcard) allows, and
    /// anything left is denied. A single denied field fails the whole call.
    /// An empty request passes as long as the role holds the operation.
    pub fn columns_allowed<I, S>(&self, entity: &str, role: &str, operation: Operation, fields: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Some(permission) = self.permission(entity, role, operation) else {
            return false;
        };
        let Some(entity) = self.entity(entity) else {
            return false;
        };

        fields.into_iter().all(|field| {
            let field = field.as_ref();
            entity.columns.contains(field) && permission.fields.allows(field)
        })
    }

    /// Known columns of `entity` that `role` may touch for `operation`, sorted
    pub fn allowed_columns(&self, entity: &str, role: &str, operation: Operation) -> Vec<&str> {
        let Some(permission) = self.permission(entity, role, operation) else {
            return Vec::new();
        };
        let Some(entity) = self.entity(entity) else {
            return Vec::new();
        };

        let mut columns: Vec<&str> = entity
            .columns
            .iter()
            .map(String::as_str)
            .filter(|column| permission.fields.allows(column))
            .collect();
        columns.sort_unstable();
        columns
    }
}
