//! Policy predicates attached to a role's operation
//!
//! The resolver never evaluates predicates. It stores them, hands them back to
//! the request handler, and at build time checks that every `@item.<field>`
//! a database policy mentions is visible to the role.

use crate::config::PolicyConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Normalized request / database predicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Predicate evaluated against the request
    pub request: Option<String>,

    /// Predicate evaluated by the database against each row
    pub database: Option<String>,
}

impl Policy {
    /// Build from configuration, treating blank predicates as absent
    pub fn from_config(config: Option<&PolicyConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };

        Self {
            request: non_blank(config.request.as_deref()),
            database: non_blank(config.database.as_deref()),
        }
    }

    /// Whether neither predicate is present
    pub fn is_empty(&self) -> bool {
        self.request.is_none() && self.database.is_none()
    }
}

fn non_blank(predicate: Option<&str>) -> Option<String> {
    predicate
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Finds the entity fields a policy predicate refers to
///
/// Fields appear as `@item.<name>`; claim references (`@claims.<name>`) are
/// ignored.
#[derive(Debug, Clone)]
pub struct PolicyFieldExtractor {
    item_ref: Regex,
}

impl PolicyFieldExtractor {
    pub fn new() -> Self {
        Self {
            item_ref: Regex::new(r"@item\.([A-Za-z_][A-Za-z0-9_]*)")
                .expect("static item reference pattern is valid"),
        }
    }

    /// Distinct field names referenced by `predicate`, sorted
    pub fn fields<'a>(&self, predicate: &'a str) -> BTreeSet<&'a str> {
        self.item_ref
            .captures_iter(predicate)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }
}

impl Default for PolicyFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}
