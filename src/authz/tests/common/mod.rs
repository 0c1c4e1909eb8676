//! Shared fixtures for integration tests

#![allow(dead_code)]

use authz_resolver::claims::{Identity, Principal};
use authz_resolver::config::{ActionConfig, EntityConfig, EntityMap, FieldsConfig, PermissionConfig, PolicyConfig};
use authz_resolver::Operation;

/// Route resolver logs to the test writer; `RUST_LOG` picks the level
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()),
        )
        .try_init();
}

/// Bookstore configuration covering tables, a view and a stored procedure
pub fn bookstore() -> EntityMap {
    let mut entities = EntityMap::new();

    entities.insert(
        "Book".to_string(),
        EntityConfig::table(["id", "title", "publisher_id", "price"])
            .with_permission(PermissionConfig::new(
                "anonymous",
                vec![ActionConfig::new(Operation::Read).with_fields(FieldsConfig::new(["*"], ["price"]))],
            ))
            .with_permission(PermissionConfig::new(
                "Editor",
                vec![ActionConfig::new(Operation::All)
                    .with_fields(FieldsConfig::include(["id", "title", "publisher_id"]))
                    .with_policy(PolicyConfig::database("@item.publisher_id eq @claims.publisher"))],
            )),
    );

    entities.insert(
        "Author".to_string(),
        EntityConfig::table(["id", "name", "email"])
            .with_permission(PermissionConfig::new(
                "anonymous",
                vec![ActionConfig::new(Operation::Read).with_fields(FieldsConfig::exclude(["email"]))],
            ))
            .with_permission(PermissionConfig::new(
                "authenticated",
                vec![ActionConfig::new(Operation::Read)],
            )),
    );

    entities.insert(
        "BookSummary".to_string(),
        EntityConfig::new(
            authz_resolver::SourceKind::View,
            vec!["id".to_string(), "title".to_string()],
        )
        .with_permission(PermissionConfig::new("Auditor", vec![ActionConfig::new(Operation::Read)])),
    );

    entities.insert(
        "GetBooks".to_string(),
        EntityConfig::stored_procedure(["id", "title"]).with_permission(PermissionConfig::new(
            "anonymous",
            vec![ActionConfig::new(Operation::All)],
        )),
    );

    entities
}

/// Signed-in caller holding `roles`
pub fn user(oid: &str, roles: &[&str]) -> Principal {
    let identity = roles.iter().fold(
        Identity::authenticated().with_claim("oid", oid).with_claim("scp", "openid"),
        |identity, role| identity.with_claim("roles", *role),
    );
    Principal::new(vec![identity])
}
