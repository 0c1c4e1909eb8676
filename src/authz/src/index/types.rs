//! Permission index type definitions

use crate::config::FieldsConfig;
use crate::policy::Policy;
use crate::types::{role_key, Operation, SourceKind, WILDCARD};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Dense id of an interned entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

/// Dense id of an interned role (case-insensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleId(pub(crate) u32);

/// Either every field, or an explicit set of field names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSet {
    All,
    Named(HashSet<String>),
}

impl FieldSet {
    /// Empty explicit set
    pub fn none() -> Self {
        FieldSet::Named(HashSet::new())
    }

    /// Build from a configured list; a `"*"` anywhere makes it [`FieldSet::All`]
    pub fn from_list(fields: &[String]) -> Self {
        if fields.iter().any(|f| f == WILDCARD) {
            FieldSet::All
        } else {
            FieldSet::Named(fields.iter().cloned().collect())
        }
    }

    /// Whether the set names `field` literally or through the wildcard
    pub fn contains(&self, field: &str) -> bool {
        match self {
            FieldSet::All => true,
            FieldSet::Named(fields) => fields.contains(field),
        }
    }
}

/// Included / excluded fields for one role and operation
///
/// Exclusion always wins over inclusion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub included: FieldSet,
    pub excluded: FieldSet,
}

impl FieldRule {
    /// Every field included, nothing excluded
    pub fn full_access() -> Self {
        Self {
            included: FieldSet::All,
            excluded: FieldSet::none(),
        }
    }

    /// Resolve a configured rule; absent sides take the full-access defaults
    pub fn from_config(config: Option<&FieldsConfig>) -> Self {
        let Some(config) = config else {
            return Self::full_access();
        };

        Self {
            included: config
                .include
                .as_deref()
                .map(FieldSet::from_list)
                .unwrap_or(FieldSet::All),
            excluded: config
                .exclude
                .as_deref()
                .map(FieldSet::from_list)
                .unwrap_or_else(FieldSet::none),
        }
    }

    /// Whether the rule lets `field` through
    ///
    /// Does not consult the entity's known columns; see
    /// [`PermissionIndex::columns_allowed`](super::PermissionIndex::columns_allowed).
    pub fn allows(&self, field: &str) -> bool {
        if self.excluded.contains(field) {
            return false;
        }
        self.included.contains(field)
    }
}

/// What one role may do for one operation on one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermission {
    pub fields: FieldRule,
    pub policy: Policy,
}

/// Roles granted one concrete operation, keyed by role id
pub(crate) type OperationSlot = BTreeMap<RoleId, RolePermission>;

/// All permissions of one entity
#[derive(Debug, Clone)]
pub(crate) struct EntityPermissions {
    pub(crate) source: SourceKind,
    pub(crate) columns: HashSet<String>,
    /// Roles in declaration order, spelled as this entity declares them
    pub(crate) roles: Vec<(RoleId, String)>,
    /// One slot per concrete operation, indexed by `Operation::slot`
    pub(crate) operations: [OperationSlot; Operation::CONCRETE_COUNT],
}

impl EntityPermissions {
    pub(crate) fn new(source: SourceKind, columns: HashSet<String>) -> Self {
        Self {
            source,
            columns,
            roles: Vec::new(),
            operations: std::array::from_fn(|_| OperationSlot::new()),
        }
    }

    /// Permissions held in `slot`, in this entity's role declaration order
    pub(crate) fn granted<'a>(
        &'a self,
        slot: &'a OperationSlot,
    ) -> impl Iterator<Item = (&'a str, &'a RolePermission)> + 'a {
        self.roles
            .iter()
            .filter_map(move |(id, name)| slot.get(id).map(|permission| (name.as_str(), permission)))
    }

    pub(crate) fn slot(&self, operation: Operation) -> Option<&OperationSlot> {
        operation.slot().map(|i| &self.operations[i])
    }

    pub(crate) fn has_role(&self, role: RoleId) -> bool {
        self.operations.iter().any(|slot| slot.contains_key(&role))
    }
}

/// Immutable permission table
///
/// Built once by [`IndexBuilder`](super::IndexBuilder) and then only read.
/// Lookups go entity name → entity id, case-folded role name → role id, and
/// operation → slot, so a request never walks nested configuration maps.
#[derive(Debug, Clone)]
pub struct PermissionIndex {
    pub(crate) entity_ids: HashMap<String, EntityId>,
    pub(crate) entity_names: Vec<String>,
    pub(crate) entities: Vec<EntityPermissions>,
    pub(crate) role_ids: HashMap<String, RoleId>,
}

impl PermissionIndex {
    pub(crate) fn entity(&self, name: &str) -> Option<&EntityPermissions> {
        self.entity_ids
            .get(name)
            .map(|id| &self.entities[id.0 as usize])
    }

    pub(crate) fn role_id(&self, role: &str) -> Option<RoleId> {
        self.role_ids.get(&role_key(role)).copied()
    }

    /// Number of indexed entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of distinct roles (case-insensitive) across all entities
    pub fn role_count(&self) -> usize {
        self.role_ids.len()
    }

    /// Names of all indexed entities
    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.entity_names.iter().map(String::as_str)
    }

    /// Source kind of an entity, if indexed
    pub fn source_kind(&self, entity: &str) -> Option<SourceKind> {
        self.entity(entity).map(|e| e.source)
    }
}
