//! Per-request role selection
//!
//! A caller picks the role it acts under through a request header. The
//! selection is only honored when the caller actually holds that role.

use crate::claims::Principal;
use crate::types::{roles_match, ROLE_ANONYMOUS, ROLE_AUTHENTICATED};
use tracing::debug;

/// Header carrying the selected role, unless configured otherwise
pub const DEFAULT_ROLE_HEADER: &str = "X-MS-API-ROLE";

/// Request input the resolver looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    /// Every value of the role-selection header, in arrival order
    pub role_header: Vec<String>,

    pub principal: Principal,
}

impl RequestContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            role_header: Vec::new(),
            principal,
        }
    }

    /// Add one role-selection header value
    pub fn with_role_header(mut self, role: impl Into<String>) -> Self {
        self.role_header.push(role.into());
        self
    }

    /// Collect the role-selection header from raw request headers
    ///
    /// `header_name` matches case-insensitively; every matching value is kept.
    pub fn from_headers<'a, I>(headers: I, header_name: &str, principal: Principal) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let role_header = headers
            .into_iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(header_name))
            .map(|(_, value)| value.to_string())
            .collect();

        Self {
            role_header,
            principal,
        }
    }

    /// The selected role, when the header carries exactly one value
    pub fn selected_role(&self) -> Option<&str> {
        match self.role_header.as_slice() {
            [role] => Some(role.as_str()),
            _ => None,
        }
    }
}

/// Whether the request's selected role may be used by its caller
///
/// - `anonymous` is always valid
/// - `authenticated` needs an authenticated identity fragment
/// - any other role needs a matching role claim on an authenticated fragment
///
/// Zero or several header values are invalid.
pub fn is_valid_role_context(request: &RequestContext, role_claim_type: &str) -> bool {
    let Some(role) = request.selected_role() else {
        debug!(
            "Rejecting role context: expected one role header value, got {}",
            request.role_header.len()
        );
        return false;
    };

    let valid = if roles_match(role, ROLE_ANONYMOUS) {
        true
    } else if roles_match(role, ROLE_AUTHENTICATED) {
        request.principal.is_authenticated()
    } else {
        request.principal.is_in_role(role_claim_type, role)
    };

    if !valid {
        debug!("Rejecting role context: caller does not hold role '{}'", role);
    }
    valid
}
