//! Caller identity types

use crate::types::roles_match;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::BTreeMap;

/// Value carried by one claim
///
/// Mirrors the JSON value cases an identity provider can emit. Numbers keep
/// the representation they were written with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Vec<ClaimValue>),
    Object(Map<String, JsonValue>),
}

impl ClaimValue {
    /// The string content, for string claims only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is an array or object value
    pub fn is_structured(&self) -> bool {
        matches!(self, ClaimValue::Array(_) | ClaimValue::Object(_))
    }

    /// Whether the value names `role`, directly or as an array element
    ///
    /// Role comparison ignores case, the same way the permission index does.
    pub fn names_role(&self, role: &str) -> bool {
        match self {
            ClaimValue::String(s) => roles_match(s, role),
            ClaimValue::Array(items) => items.iter().any(|item| item.names_role(role)),
            _ => false,
        }
    }
}

impl From<&str> for ClaimValue {
    fn from(value: &str) -> Self {
        ClaimValue::String(value.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(value: String) -> Self {
        ClaimValue::String(value)
    }
}

impl From<bool> for ClaimValue {
    fn from(value: bool) -> Self {
        ClaimValue::Boolean(value)
    }
}

impl From<i64> for ClaimValue {
    fn from(value: i64) -> Self {
        ClaimValue::Number(value.into())
    }
}

impl<T: Into<ClaimValue>> From<Vec<T>> for ClaimValue {
    fn from(values: Vec<T>) -> Self {
        ClaimValue::Array(values.into_iter().map(Into::into).collect())
    }
}

/// One (type, value) pair asserted about the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: ClaimValue,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// One identity fragment of a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Whether the fragment was established by an authentication handler
    pub authenticated: bool,

    /// Claims in the order they were asserted
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl Identity {
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            claims: Vec::new(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn with_claim(mut self, claim_type: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.claims.push(Claim::new(claim_type, value));
        self
    }
}

/// The caller, made of one or more identity fragments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    pub identities: Vec<Identity>,
}

impl Principal {
    pub fn new(identities: Vec<Identity>) -> Self {
        Self { identities }
    }

    /// Caller with a single unauthenticated fragment
    pub fn anonymous() -> Self {
        Self::new(vec![Identity::unauthenticated()])
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identities.push(identity);
        self
    }

    /// Whether any fragment is authenticated
    pub fn is_authenticated(&self) -> bool {
        self.identities.iter().any(|identity| identity.authenticated)
    }

    /// Claims of authenticated fragments, in fragment then assertion order
    pub fn authenticated_claims(&self) -> impl Iterator<Item = &Claim> {
        self.identities
            .iter()
            .filter(|identity| identity.authenticated)
            .flat_map(|identity| identity.claims.iter())
    }

    /// Whether an authenticated fragment carries `role` under `role_claim_type`
    ///
    /// Claim types match exactly; role values ignore case.
    pub fn is_in_role(&self, role_claim_type: &str, role: &str) -> bool {
        self.authenticated_claims()
            .filter(|claim| claim.claim_type == role_claim_type)
            .any(|claim| claim.value.names_role(role))
    }
}

/// Flat claim type → string value mapping handed to policy evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedClaims(BTreeMap<String, String>);

impl NormalizedClaims {
    pub(crate) fn insert(&mut self, claim_type: String, value: String) {
        self.0.insert(claim_type, value);
    }

    pub fn get(&self, claim_type: &str) -> Option<&str> {
        self.0.get(claim_type).map(String::as_str)
    }

    pub fn contains(&self, claim_type: &str) -> bool {
        self.0.contains_key(claim_type)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in claim type order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}
