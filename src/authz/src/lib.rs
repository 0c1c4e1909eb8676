//! # Authorization Resolver
//!
//! Role- and field-level authorization for a REST/GraphQL data gateway.
//!
//! ## Features
//!
//! - **Immutable permission index** built once from entity configuration
//! - **Case-insensitive roles** with `anonymous` → `authenticated` inheritance
//! - **Field rules** with include/exclude lists and wildcards
//! - **Role selection** through a request header, checked against role claims
//! - **Claim normalization** for substitution into row-level policies
//!
//! ## Example
//!
//! ```rust
//! use authz_resolver::claims::{Identity, Principal};
//! use authz_resolver::config::{ActionConfig, EntityConfig, EntityMap, FieldsConfig, PermissionConfig};
//! use authz_resolver::{AuthorizationResolver, Operation, RequestContext, ResolverConfig};
//!
//! let mut entities = EntityMap::new();
//! entities.insert(
//!     "Book".to_string(),
//!     EntityConfig::table(["id", "title", "price"]).with_permission(PermissionConfig::new(
//!         "Editor",
//!         vec![ActionConfig::new(Operation::All).with_fields(FieldsConfig::new(["*"], ["price"]))],
//!     )),
//! );
//!
//! let resolver = AuthorizationResolver::new(&entities, ResolverConfig::default())?;
//!
//! let principal = Principal::new(vec![Identity::authenticated().with_claim("roles", "Editor")]);
//! let request = RequestContext::new(principal).with_role_header("editor");
//!
//! assert!(resolver.is_valid_role_context(&request));
//! assert!(resolver.is_defined("Book", "editor", Operation::Update));
//! assert!(resolver.columns_allowed("Book", "editor", Operation::Update, ["title"]));
//! assert!(!resolver.columns_allowed("Book", "editor", Operation::Update, ["price"]));
//! assert_eq!(resolver.processed_user_claims(&request).get("roles"), Some("editor"));
//! # Ok::<(), authz_resolver::ConfigError>(())
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod policy;
pub mod index;
pub mod claims;
pub mod role_context;
pub mod resolver;

// Re-export commonly used types
pub use types::{Operation, SourceKind, ROLE_ANONYMOUS, ROLE_AUTHENTICATED};
pub use config::{EntityConfig, EntityMap};
pub use error::{ConfigError, Result};
pub use index::{IndexBuilder, PermissionIndex};
pub use policy::Policy;
pub use claims::{NormalizedClaims, Principal};
pub use role_context::{is_valid_role_context, RequestContext};
pub use resolver::{AuthorizationResolver, ResolverConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
