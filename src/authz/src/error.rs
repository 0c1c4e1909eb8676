//! Error types for the authorization resolver
//!
//! Only configuration problems are errors. Request-time denial is a plain
//! `false` from the query methods.

use crate::types::{Operation, SourceKind};
use thiserror::Error;

/// Configuration errors raised while building the permission index
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not supported by the entity's source kind
    #[error("action:{operation} specified for entity:{entity}, role:{role} is not valid.")]
    InvalidOperation {
        entity: String,
        role: String,
        operation: Operation,
        source_kind: SourceKind,
    },

    /// Stored procedures only accept `execute`
    #[error("Invalid operation for Entity: {entity}. Stored procedures can only be configured with the 'execute' operation.")]
    InvalidProcedureOperation { entity: String },

    /// Database policy references a field the role cannot access
    #[error("Not all the columns required by policy are accessible.")]
    InaccessiblePolicyFields {
        entity: String,
        role: String,
        operation: Operation,
        fields: Vec<String>,
    },

    /// Entity added twice
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    /// Role declared twice on one entity (case-insensitive)
    #[error("Duplicate role '{role}' on entity: {entity}")]
    DuplicateRole { entity: String, role: String },

    /// Same concrete operation declared twice for one role
    #[error("Operation {operation} declared more than once for role '{role}' on entity: {entity}")]
    DuplicateOperation {
        entity: String,
        role: String,
        operation: Operation,
    },

    /// Invalid resolver setting
    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
}

/// Result type for index construction
pub type Result<T> = std::result::Result<T, ConfigError>;
