//! Permission index construction
//!
//! The builder turns the access-control configuration into a
//! [`PermissionIndex`] in three steps per entity:
//!
//! 1. Validate every declared operation against the entity's source kind and
//!    expand the wildcard operation into concrete operations.
//! 2. Resolve field rules and policies, checking that database policies only
//!    reference fields the role can see.
//! 3. Copy `anonymous` permissions to `authenticated` when the latter has no
//!    declarations of its own.
//!
//! Any inconsistency fails the whole build.

use super::types::{EntityId, EntityPermissions, FieldRule, PermissionIndex, RoleId, RolePermission};
use crate::config::{ActionConfig, EntityConfig, EntityMap};
use crate::error::{ConfigError, Result};
use crate::policy::{Policy, PolicyFieldExtractor};
use crate::types::{role_key, Operation, SourceKind, ROLE_ANONYMOUS, ROLE_AUTHENTICATED};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// One role's validated declarations, before role interning
struct ResolvedRole {
    name: String,
    operations: Vec<(Operation, RolePermission)>,
}

/// Builder for [`PermissionIndex`]
///
/// # Example
///
/// ```rust
/// use authz_resolver::config::{ActionConfig, EntityConfig, PermissionConfig};
/// use authz_resolver::index::IndexBuilder;
/// use authz_resolver::Operation;
///
/// let book = EntityConfig::table(["id", "title"])
///     .with_permission(PermissionConfig::new("anonymous", vec![ActionConfig::new(Operation::Read)]));
///
/// let mut builder = IndexBuilder::new();
/// builder.add_entity("Book", &book)?;
/// let index = builder.build()?;
///
/// assert!(index.is_defined("Book", "authenticated", Operation::Read));
/// # Ok::<(), authz_resolver::ConfigError>(())
/// ```
pub struct IndexBuilder {
    extractor: PolicyFieldExtractor,
    entity_ids: HashMap<String, EntityId>,
    entity_names: Vec<String>,
    entities: Vec<EntityPermissions>,
    role_ids: HashMap<String, RoleId>,
}

impl IndexBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            extractor: PolicyFieldExtractor::new(),
            entity_ids: HashMap::new(),
            entity_names: Vec::new(),
            entities: Vec::new(),
            role_ids: HashMap::new(),
        }
    }

    /// Add every entity of a configuration map
    pub fn add_entities(&mut self, entities: &EntityMap) -> Result<()> {
        for (name, config) in entities {
            self.add_entity(name, config)?;
        }
        Ok(())
    }

    /// Validate and index one entity
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entity or one of its roles has an empty name
    /// - The entity was already added
    /// - A role is declared twice, or declares the same operation twice
    /// - An operation is not valid for the entity's source kind
    /// - A database policy references a field the role cannot access
    pub fn add_entity(&mut self, name: &str, config: &EntityConfig) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidInput(
                "Entity name cannot be empty".to_string(),
            ));
        }

        if self.entity_ids.contains_key(name) {
            return Err(ConfigError::DuplicateEntity(name.to_string()));
        }

        let columns: HashSet<String> = config.columns.iter().cloned().collect();
        let roles = self.resolve_roles(name, config, &columns)?;

        // Nothing below can fail, so interning never leaves a half-added entity.
        let mut entity = EntityPermissions::new(config.source, columns);
        for role in roles {
            let role_id = self.intern_role(&role.name);
            for (operation, permission) in role.operations {
                if let Some(slot) = operation.slot() {
                    entity.operations[slot].insert(role_id, permission);
                }
            }
            entity.roles.push((role_id, role.name));
        }

        self.inherit_anonymous(name, &mut entity);

        let id = EntityId(self.entities.len() as u32);
        self.entity_ids.insert(name.to_string(), id);
        self.entity_names.push(name.to_string());
        self.entities.push(entity);

        Ok(())
    }

    /// Finish the build
    pub fn build(self) -> Result<PermissionIndex> {
        info!(
            "PermissionIndex built with {} entities and {} roles",
            self.entities.len(),
            self.role_ids.len()
        );

        Ok(PermissionIndex {
            entity_ids: self.entity_ids,
            entity_names: self.entity_names,
            entities: self.entities,
            role_ids: self.role_ids,
        })
    }

    fn resolve_roles(
        &self,
        entity: &str,
        config: &EntityConfig,
        columns: &HashSet<String>,
    ) -> Result<Vec<ResolvedRole>> {
        let mut seen = HashSet::new();
        let mut roles = Vec::with_capacity(config.permissions.len());

        for permission in &config.permissions {
            let role = permission.role.trim();
            if role.is_empty() {
                return Err(ConfigError::InvalidInput(format!(
                    "Entity '{}' has a permission with an empty role name",
                    entity
                )));
            }

            if permission.actions.is_empty() {
                return Err(ConfigError::InvalidInput(format!(
                    "Role '{}' on entity '{}' declares no actions",
                    role, entity
                )));
            }

            if !seen.insert(role_key(role)) {
                return Err(ConfigError::DuplicateRole {
                    entity: entity.to_string(),
                    role: role.to_string(),
                });
            }

            let mut operations: Vec<(Operation, RolePermission)> = Vec::new();
            for action in &permission.actions {
                for &operation in Self::expand(entity, role, config.source, action)? {
                    if operations.iter().any(|(existing, _)| *existing == operation) {
                        return Err(ConfigError::DuplicateOperation {
                            entity: entity.to_string(),
                            role: role.to_string(),
                            operation,
                        });
                    }

                    let permission = RolePermission {
                        fields: FieldRule::from_config(action.fields.as_ref()),
                        policy: Policy::from_config(action.policy.as_ref()),
                    };
                    self.check_policy_fields(entity, role, operation, &permission, columns)?;
                    operations.push((operation, permission));
                }
            }

            roles.push(ResolvedRole {
                name: role.to_string(),
                operations,
            });
        }

        Ok(roles)
    }

    /// Concrete operations a declared action stands for
    fn expand(
        entity: &str,
        role: &str,
        source: SourceKind,
        action: &ActionConfig,
    ) -> Result<&'static [Operation]> {
        if !source.supports(action.action) {
            return Err(match source {
                SourceKind::StoredProcedure => ConfigError::InvalidProcedureOperation {
                    entity: entity.to_string(),
                },
                SourceKind::Table | SourceKind::View => ConfigError::InvalidOperation {
                    entity: entity.to_string(),
                    role: role.to_string(),
                    operation: action.action,
                    source_kind: source,
                },
            });
        }

        Ok(match action.action {
            Operation::Create => &[Operation::Create],
            Operation::Read => &[Operation::Read],
            Operation::Update => &[Operation::Update],
            Operation::Delete => &[Operation::Delete],
            Operation::Execute => &[Operation::Execute],
            Operation::All => source.operations(),
        })
    }

    fn check_policy_fields(
        &self,
        entity: &str,
        role: &str,
        operation: Operation,
        permission: &RolePermission,
        columns: &HashSet<String>,
    ) -> Result<()> {
        let Some(predicate) = permission.policy.database.as_deref() else {
            return Ok(());
        };

        let inaccessible: Vec<String> = self
            .extractor
            .fields(predicate)
            .into_iter()
            .filter(|field| !columns.contains(*field) || !permission.fields.allows(field))
            .map(str::to_string)
            .collect();

        if inaccessible.is_empty() {
            return Ok(());
        }

        Err(ConfigError::InaccessiblePolicyFields {
            entity: entity.to_string(),
            role: role.to_string(),
            operation,
            fields: inaccessible,
        })
    }

    fn intern_role(&mut self, name: &str) -> RoleId {
        let next = RoleId(self.role_ids.len() as u32);
        *self.role_ids.entry(role_key(name)).or_insert(next)
    }

    /// `authenticated` takes over `anonymous` permissions when it declares none
    fn inherit_anonymous(&mut self, entity_name: &str, entity: &mut EntityPermissions) {
        let Some(anonymous) = self.role_ids.get(ROLE_ANONYMOUS).copied() else {
            return;
        };
        if !entity.has_role(anonymous) {
            return;
        }

        if let Some(authenticated) = self.role_ids.get(ROLE_AUTHENTICATED).copied() {
            if entity.has_role(authenticated) {
                return;
            }
        }

        let authenticated = self.intern_role(ROLE_AUTHENTICATED);
        for slot in entity.operations.iter_mut() {
            if let Some(permission) = slot.get(&anonymous).cloned() {
                slot.insert(authenticated, permission);
            }
        }
        entity.roles.push((authenticated, ROLE_AUTHENTICATED.to_string()));

        debug!(
            "Entity '{}': copied anonymous permissions to authenticated",
            entity_name
        );
    }
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionIndex {
    /// Build an index from a whole configuration map
    pub fn from_entities(entities: &EntityMap) -> Result<Self> {
        let mut builder = IndexBuilder::new();
        builder.add_entities(entities)?;
        builder.build()
    }
}
