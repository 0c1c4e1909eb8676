//! Authorization resolver facade
//!
//! Owns the shared [`PermissionIndex`] and the runtime settings, and exposes
//! every request-time check. A resolver is cheap to clone and safe to share
//! across threads.
//!
//! # Architecture
//!
//! ```text
//! Request → is_valid_role_context → is_defined → columns_allowed → processed_user_claims
//!                 ↓                      ↓              ↓                    ↓
//!           [Principal]          [PermissionIndex] ─────┘          [external policy evaluator]
//! ```

use crate::claims::{ClaimsByType, ClaimsNormalizer, NormalizedClaims, Principal, DEFAULT_ROLE_CLAIM_TYPE, DEFAULT_SCOPE_CLAIM_TYPE};
use crate::config::EntityMap;
use crate::error::{ConfigError, Result};
use crate::index::PermissionIndex;
use crate::policy::Policy;
use crate::role_context::{self, RequestContext, DEFAULT_ROLE_HEADER};
use crate::types::Operation;
use std::sync::Arc;
use tracing::{debug, info};

/// Environment variable overriding [`ResolverConfig::role_header`]
pub const ENV_ROLE_HEADER: &str = "AUTHZ_ROLE_HEADER";

/// Environment variable overriding [`ResolverConfig::role_claim_type`]
pub const ENV_ROLE_CLAIM_TYPE: &str = "AUTHZ_ROLE_CLAIM_TYPE";

/// Environment variable overriding [`ResolverConfig::scope_claim_types`] (comma separated)
pub const ENV_SCOPE_CLAIM_TYPES: &str = "AUTHZ_SCOPE_CLAIM_TYPES";

/// Resolver runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Request header carrying the selected role
    pub role_header: String,

    /// Claim type carrying role memberships
    pub role_claim_type: String,

    /// Claim types normalized as space-delimited scope lists
    pub scope_claim_types: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            role_header: DEFAULT_ROLE_HEADER.to_string(),
            role_claim_type: DEFAULT_ROLE_CLAIM_TYPE.to_string(),
            scope_claim_types: vec![DEFAULT_SCOPE_CLAIM_TYPE.to_string()],
        }
    }
}

impl ResolverConfig {
    pub fn with_role_header(mut self, header: impl Into<String>) -> Self {
        self.role_header = header.into();
        self
    }

    pub fn with_role_claim_type(mut self, claim_type: impl Into<String>) -> Self {
        self.role_claim_type = claim_type.into();
        self
    }

    pub fn with_scope_claim_types<I, S>(mut self, claim_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope_claim_types = claim_types.into_iter().map(Into::into).collect();
        self
    }

    /// Defaults overridden by the `AUTHZ_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] when a variable is set but blank.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(header) = lookup(ENV_ROLE_HEADER) {
            config.role_header = non_blank(ENV_ROLE_HEADER, &header)?;
        }

        if let Some(claim_type) = lookup(ENV_ROLE_CLAIM_TYPE) {
            config.role_claim_type = non_blank(ENV_ROLE_CLAIM_TYPE, &claim_type)?;
        }

        if let Some(scopes) = lookup(ENV_SCOPE_CLAIM_TYPES) {
            let scope_claim_types: Vec<String> = scopes
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if scope_claim_types.is_empty() {
                return Err(ConfigError::InvalidSetting {
                    name: ENV_SCOPE_CLAIM_TYPES.to_string(),
                    reason: "expected at least one claim type".to_string(),
                });
            }
            config.scope_claim_types = scope_claim_types;
        }

        Ok(config)
    }
}

fn non_blank(name: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::InvalidSetting {
            name: name.to_string(),
            reason: "value cannot be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

/// Request-time authorization checks over one immutable permission index
#[derive(Debug, Clone)]
pub struct AuthorizationResolver {
    index: Arc<PermissionIndex>,
    normalizer: ClaimsNormalizer,
    config: ResolverConfig,
}

impl AuthorizationResolver {
    /// Build the permission index from configuration
    ///
    /// # Errors
    ///
    /// Fails with the first [`ConfigError`] found in `entities`.
    pub fn new(entities: &EntityMap, config: ResolverConfig) -> Result<Self> {
        let index = PermissionIndex::from_entities(entities)?;
        Ok(Self::from_index(Arc::new(index), config))
    }

    /// Wrap an already built index
    pub fn from_index(index: Arc<PermissionIndex>, config: ResolverConfig) -> Self {
        let normalizer = ClaimsNormalizer::new(config.role_claim_type.clone())
            .with_scope_claim_types(config.scope_claim_types.iter().cloned());

        info!(
            "AuthorizationResolver ready: {} entities, role header '{}', role claim '{}'",
            index.entity_count(),
            config.role_header,
            config.role_claim_type
        );

        Self {
            index,
            normalizer,
            config,
        }
    }

    pub fn index(&self) -> &Arc<PermissionIndex> {
        &self.index
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Build a request context from raw headers using the configured role header
    pub fn request_context<'a, I>(&self, headers: I, principal: Principal) -> RequestContext
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        RequestContext::from_headers(headers, &self.config.role_header, principal)
    }

    /// Whether the caller may act under the role selected in the request
    pub fn is_valid_role_context(&self, request: &RequestContext) -> bool {
        role_context::is_valid_role_context(request, &self.config.role_claim_type)
    }

    /// Whether `role` may perform `operation` on `entity`
    pub fn is_defined(&self, entity: &str, role: &str, operation: Operation) -> bool {
        let defined = self.index.is_defined(entity, role, operation);
        if !defined {
            debug!(
                "No permission for role '{}' to {} entity '{}'",
                role, operation, entity
            );
        }
        defined
    }

    /// Whether every requested field is accessible
    pub fn columns_allowed<I, S>(&self, entity: &str, role: &str, operation: Operation, fields: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = self.index.columns_allowed(entity, role, operation, fields);
        if !allowed {
            debug!(
                "Role '{}' denied fields of entity '{}' for {}",
                role, entity, operation
            );
        }
        allowed
    }

    pub fn allowed_columns(&self, entity: &str, role: &str, operation: Operation) -> Vec<&str> {
        self.index.allowed_columns(entity, role, operation)
    }

    pub fn roles_for(&self, entity: &str, operation: Operation) -> Vec<&str> {
        self.index.roles_for(entity, operation)
    }

    pub fn roles_for_field(&self, entity: &str, field: &str, operation: Operation) -> Vec<&str> {
        self.index.roles_for_field(entity, field, operation)
    }

    pub fn policy(&self, entity: &str, role: &str, operation: Operation) -> Option<&Policy> {
        self.index.policy(entity, role, operation)
    }

    pub fn authenticated_user_claims(&self, request: &RequestContext) -> ClaimsByType {
        self.normalizer.authenticated_user_claims(request)
    }

    pub fn processed_user_claims(&self, request: &RequestContext) -> NormalizedClaims {
        self.normalizer.processed_user_claims(request)
    }
}
