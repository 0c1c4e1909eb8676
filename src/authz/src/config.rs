//! Access-control configuration model
//!
//! These types mirror the permission section of the runtime configuration.
//! Loading them from a file is the job of the caller; they derive `serde` so a
//! loader can deserialize them directly.
//!
//! ```json
//! {
//!   "source": "table",
//!   "columns": ["id", "title", "owner"],
//!   "permissions": [
//!     { "role": "anonymous", "actions": ["read"] },
//!     { "role": "editor", "actions": [
//!         { "action": "*", "fields": { "include": ["*"], "exclude": ["owner"] } }
//!     ] }
//!   ]
//! }
//! ```

use crate::types::{Operation, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entities keyed by name
pub type EntityMap = BTreeMap<String, EntityConfig>;

/// One configured entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Backing object kind
    pub source: SourceKind,

    /// Known column (field) names of the entity
    #[serde(default)]
    pub columns: Vec<String>,

    /// Per-role permission declarations
    #[serde(default)]
    pub permissions: Vec<PermissionConfig>,
}

impl EntityConfig {
    /// Create an entity of the given kind
    pub fn new(source: SourceKind, columns: Vec<String>) -> Self {
        Self {
            source,
            columns,
            permissions: Vec::new(),
        }
    }

    /// Table-backed entity with the given columns
    pub fn table<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SourceKind::Table, columns.into_iter().map(Into::into).collect())
    }

    /// Stored-procedure-backed entity with the given result columns
    pub fn stored_procedure<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            SourceKind::StoredProcedure,
            columns.into_iter().map(Into::into).collect(),
        )
    }

    /// Add a role permission
    pub fn with_permission(mut self, permission: PermissionConfig) -> Self {
        self.permissions.push(permission);
        self
    }
}

/// Operations one role may perform on an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    pub role: String,
    pub actions: Vec<ActionConfig>,
}

impl PermissionConfig {
    pub fn new(role: impl Into<String>, actions: Vec<ActionConfig>) -> Self {
        Self {
            role: role.into(),
            actions,
        }
    }
}

/// One declared operation with its optional field rule and policy
///
/// Deserializes from either a bare operation name (`"read"`) or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAction")]
pub struct ActionConfig {
    pub action: Operation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyConfig>,
}

impl ActionConfig {
    pub fn new(action: Operation) -> Self {
        Self {
            action,
            fields: None,
            policy: None,
        }
    }

    pub fn with_fields(mut self, fields: FieldsConfig) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = Some(policy);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAction {
    Name(Operation),
    Full {
        action: Operation,
        #[serde(default)]
        fields: Option<FieldsConfig>,
        #[serde(default)]
        policy: Option<PolicyConfig>,
    },
}

impl From<RawAction> for ActionConfig {
    fn from(raw: RawAction) -> Self {
        match raw {
            RawAction::Name(action) => ActionConfig::new(action),
            RawAction::Full {
                action,
                fields,
                policy,
            } => ActionConfig {
                action,
                fields,
                policy,
            },
        }
    }
}

/// Included / excluded field lists; `"*"` stands for every field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
}

impl FieldsConfig {
    pub fn new<I, E, S, T>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            include: Some(include.into_iter().map(Into::into).collect()),
            exclude: Some(exclude.into_iter().map(Into::into).collect()),
        }
    }

    /// Only an include list; exclude stays absent
    pub fn include<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Some(include.into_iter().map(Into::into).collect()),
            exclude: None,
        }
    }

    /// Only an exclude list; include stays absent
    pub fn exclude<I, S>(exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: None,
            exclude: Some(exclude.into_iter().map(Into::into).collect()),
        }
    }
}

/// Request and database policy predicates, opaque to the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl PolicyConfig {
    pub fn database(predicate: impl Into<String>) -> Self {
        Self {
            request: None,
            database: Some(predicate.into()),
        }
    }

    pub fn request(predicate: impl Into<String>) -> Self {
        Self {
            request: Some(predicate.into()),
            database: None,
        }
    }
}
