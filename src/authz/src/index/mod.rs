//! Permission index module
//!
//! Builds the immutable permission table from configuration and answers the
//! request-time questions against it.
//!
//! # Features
//!
//! - **Wildcard expansion**: `*` becomes CRUD for tables/views and `execute` for stored procedures
//! - **Field rules**: exclusion over inclusion, wildcard on either side
//! - **System-role inheritance**: `authenticated` inherits `anonymous` when undeclared
//! - **Lock-free reads**: the index is never mutated after [`IndexBuilder::build`]
//!
//! # Example
//!
//! ```rust
//! use authz_resolver::config::{ActionConfig, EntityConfig, EntityMap, FieldsConfig, PermissionConfig};
//! use authz_resolver::index::PermissionIndex;
//! use authz_resolver::Operation;
//!
//! let mut entities = EntityMap::new();
//! entities.insert(
//!     "SampleEntity".to_string(),
//!     EntityConfig::table(["col1", "col2", "col3"]).with_permission(PermissionConfig::new(
//!         "Writer",
//!         vec![ActionConfig::new(Operation::Create).with_fields(FieldsConfig::include(["col1", "col2"]))],
//!     )),
//! );
//!
//! let index = PermissionIndex::from_entities(&entities)?;
//! assert!(index.is_defined("SampleEntity", "writer", Operation::Create));
//! assert!(index.columns_allowed("SampleEntity", "Writer", Operation::Create, ["col1", "col2"]));
//! assert!(!index.columns_allowed("SampleEntity", "Writer", Operation::Create, ["col3"]));
//! # Ok::<(), authz_resolver::ConfigError>(())
//! ```

mod builder;
mod columns;
mod query;
pub mod types;


pub use builder::IndexBuilder;
pub use types::{FieldRule, FieldSet, PermissionIndex, RolePermission};
