//! Caller identity and claim normalization
//!
//! A [`Principal`] is built by the authentication layer from one or more
//! identity fragments. Only authenticated fragments contribute claims; the
//! [`ClaimsNormalizer`] flattens them for policy substitution.

mod convert;
mod normalizer;
mod types;


pub use normalizer::{ClaimsByType, ClaimsNormalizer, DEFAULT_ROLE_CLAIM_TYPE, DEFAULT_SCOPE_CLAIM_TYPE};
pub use types::{Claim, ClaimValue, Identity, NormalizedClaims, Principal};
