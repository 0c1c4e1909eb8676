//! Core authorization types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// System role every caller may select, authenticated or not
pub const ROLE_ANONYMOUS: &str = "anonymous";

/// System role every authenticated caller may select
pub const ROLE_AUTHENTICATED: &str = "authenticated";

/// Wildcard marker for field rules and operations
pub const WILDCARD: &str = "*";

/// Operation a role may perform on an entity
///
/// `All` only exists in configuration. The index expands it into the concrete
/// operations of the entity's source kind and never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Execute,
    #[serde(rename = "*", alias = "all")]
    All,
}

impl Operation {
    /// Operations valid for tables and views
    pub const TABLE: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];

    /// Operations valid for stored procedures
    pub const PROCEDURE: [Operation; 1] = [Operation::Execute];

    /// Number of concrete (storable) operations
    pub(crate) const CONCRETE_COUNT: usize = 5;

    /// Dense slot of a concrete operation, `None` for the wildcard
    pub(crate) fn slot(self) -> Option<usize> {
        match self {
            Operation::Create => Some(0),
            Operation::Read => Some(1),
            Operation::Update => Some(2),
            Operation::Delete => Some(3),
            Operation::Execute => Some(4),
            Operation::All => None,
        }
    }

    /// Whether this is the wildcard operation
    pub fn is_wildcard(self) -> bool {
        self == Operation::All
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Execute => "execute",
            Operation::All => WILDCARD,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Operation::Create),
            "read" => Ok(Operation::Read),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            "execute" => Ok(Operation::Execute),
            "*" | "all" => Ok(Operation::All),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Kind of database object backing an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Table,
    View,
    #[serde(alias = "stored_procedure", alias = "procedure")]
    StoredProcedure,
}

impl SourceKind {
    /// Concrete operations this kind of entity supports
    pub fn operations(self) -> &'static [Operation] {
        match self {
            SourceKind::Table | SourceKind::View => &Operation::TABLE,
            SourceKind::StoredProcedure => &Operation::PROCEDURE,
        }
    }

    /// Whether `operation` may be declared on this kind of entity
    ///
    /// The wildcard is always declarable; it expands to [`SourceKind::operations`].
    pub fn supports(self, operation: Operation) -> bool {
        operation.is_wildcard() || self.operations().contains(&operation)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Table => f.write_str("table"),
            SourceKind::View => f.write_str("view"),
            SourceKind::StoredProcedure => f.write_str("stored-procedure"),
        }
    }
}

/// Case-folded form of a role name
///
/// Every role comparison in the crate goes through this, so the index, the
/// role-context check and claim matching always agree.
pub fn role_key(role: &str) -> String {
    role.to_lowercase()
}

/// Whether two role names denote the same role
pub fn roles_match(a: &str, b: &str) -> bool {
    a == b || role_key(a) == role_key(b)
}

/// Whether `role` names one of the two system roles
pub fn is_system_role(role: &str) -> bool {
    roles_match(role, ROLE_ANONYMOUS) || roles_match(role, ROLE_AUTHENTICATED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parsing() {
        assert_eq!("Create".parse::<Operation>().unwrap(), Operation::Create);
        assert_eq!(" read ".parse::<Operation>().unwrap(), Operation::Read);
        assert_eq!("*".parse::<Operation>().unwrap(), Operation::All);
        assert_eq!("ALL".parse::<Operation>().unwrap(), Operation::All);
        assert!("upsert".parse::<Operation>().is_err());
    }

    #[test]
    fn test_operation_serde() {
        let ops: Vec<Operation> = serde_json::from_str(r#"["create", "*", "all", "execute"]"#).unwrap();
        assert_eq!(
            ops,
            vec![Operation::Create, Operation::All, Operation::All, Operation::Execute]
        );
        assert_eq!(serde_json::to_string(&Operation::All).unwrap(), "\"*\"");
    }

    #[test]
    fn test_source_kind_operations() {
        assert_eq!(SourceKind::Table.operations(), &Operation::TABLE);
        assert_eq!(SourceKind::View.operations(), &Operation::TABLE);
        assert_eq!(SourceKind::StoredProcedure.operations(), &[Operation::Execute]);

        assert!(SourceKind::Table.supports(Operation::All));
        assert!(!SourceKind::Table.supports(Operation::Execute));
        assert!(!SourceKind::StoredProcedure.supports(Operation::Read));

        let kind: SourceKind = serde_json::from_str("\"stored-procedure\"").unwrap();
        assert_eq!(kind, SourceKind::StoredProcedure);
    }

    #[test]
    fn test_slots_are_dense() {
        let mut slots: Vec<usize> = Operation::TABLE
            .iter()
            .chain(Operation::PROCEDURE.iter())
            .filter_map(|op| op.slot())
            .collect();
        slots.sort();
        assert_eq!(slots, (0..Operation::CONCRETE_COUNT).collect::<Vec<_>>());
        assert_eq!(Operation::All.slot(), None);
    }

    #[test]
    fn test_system_roles() {
        assert!(is_system_role("Anonymous"));
        assert!(is_system_role("AUTHENTICATED"));
        assert!(!is_system_role("reader"));
    }

    #[test]
    fn test_role_matching_folds_unicode_case() {
        assert!(roles_match("Writer", "wRiTeR"));
        assert!(roles_match("Éditeur", "éditeur"));
        assert!(roles_match("ÉDITEUR", "éditeur"));
        assert!(!roles_match("Éditeur", "Editeur"));
        assert_eq!(role_key("Éditeur"), role_key("éDITEUR"));
    }
}
