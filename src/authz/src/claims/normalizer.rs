//! Claim normalization for policy evaluation
//!
//! Collapses the caller's claims into a flat claim type → string mapping. The
//! role claim is always reduced to the single role selected for the request,
//! so a policy can never observe other roles the caller happens to hold.

use super::types::{Claim, ClaimValue, NormalizedClaims};
use crate::role_context::RequestContext;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Claim type carrying role memberships, unless configured otherwise
pub const DEFAULT_ROLE_CLAIM_TYPE: &str = "roles";

/// Claim type carrying delegated scopes, unless configured otherwise
pub const DEFAULT_SCOPE_CLAIM_TYPE: &str = "scp";

/// Claims grouped by type, in assertion order
pub type ClaimsByType = HashMap<String, Vec<Claim>>;

/// Flattens a caller's claims
#[derive(Debug, Clone)]
pub struct ClaimsNormalizer {
    role_claim_type: String,
    scope_claim_types: HashSet<String>,
}

impl ClaimsNormalizer {
    pub fn new(role_claim_type: impl Into<String>) -> Self {
        Self {
            role_claim_type: role_claim_type.into(),
            scope_claim_types: HashSet::from([DEFAULT_SCOPE_CLAIM_TYPE.to_string()]),
        }
    }

    /// Replace the claim types treated as space-delimited scope lists
    pub fn with_scope_claim_types<I, S>(mut self, claim_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope_claim_types = claim_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn role_claim_type(&self) -> &str {
        &self.role_claim_type
    }

    /// Claims of the caller's authenticated fragments, grouped by type
    ///
    /// The role claim is narrowed to the selected role, spelled as in the
    /// request header. When the caller is authenticated but carries no claim
    /// for that role (e.g. a system role), one is added. Without a single
    /// selected role no role claim is kept.
    pub fn authenticated_user_claims(&self, request: &RequestContext) -> ClaimsByType {
        let mut claims = ClaimsByType::new();
        if !request.principal.is_authenticated() {
            return claims;
        }

        for claim in request.principal.authenticated_claims() {
            if claim.claim_type == self.role_claim_type {
                continue;
            }
            claims.entry(claim.claim_type.clone()).or_default().push(claim.clone());
        }

        if let Some(role) = request.selected_role() {
            claims.insert(
                self.role_claim_type.clone(),
                vec![Claim::new(self.role_claim_type.clone(), role)],
            );
        }

        claims
    }

    /// Flat claim type → value mapping handed to policy evaluation
    ///
    /// - one scalar instance: verbatim text (null becomes empty)
    /// - several instances, or one array/object: compact JSON
    /// - scope claim types: one space-delimited string
    pub fn processed_user_claims(&self, request: &RequestContext) -> NormalizedClaims {
        let mut normalized = NormalizedClaims::default();

        for (claim_type, instances) in self.authenticated_user_claims(request) {
            let value = if self.scope_claim_types.contains(&claim_type) {
                join_scopes(&instances)
            } else {
                flatten(&instances)
            };
            normalized.insert(claim_type, value);
        }

        debug!("Normalized {} claim types", normalized.len());
        normalized
    }
}

impl Default for ClaimsNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_CLAIM_TYPE)
    }
}

fn flatten(instances: &[Claim]) -> String {
    match instances {
        [single] => single.value.to_text(),
        _ => JsonValue::Array(instances.iter().map(|claim| claim.value.to_json()).collect()).to_string(),
    }
}

fn join_scopes(instances: &[Claim]) -> String {
    let mut scopes = Vec::new();
    for claim in instances {
        collect_scopes(&claim.value, &mut scopes);
    }
    scopes.join(" ")
}

fn collect_scopes(value: &ClaimValue, scopes: &mut Vec<String>) {
    match value {
        ClaimValue::Array(items) => {
            for item in items {
                collect_scopes(item, scopes);
            }
        }
        ClaimValue::Null => {}
        other => {
            let text = other.to_text();
            if !text.is_empty() {
                scopes.push(text);
            }
        }
    }
}
