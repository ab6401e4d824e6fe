//! Route gating expressed as data: a policy in, a typed decision out.

use serde::Serialize;

use crate::ADMIN_ROLE;
use crate::domain::auth::AuthenticatedUser;

/// Who may run a page operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Only visitors that are not logged in (login and registration pages).
    AnonymousOnly,
    /// Any logged-in user.
    Authenticated,
    /// Logged-in users holding at least one of the listed roles.
    Roles(&'static [&'static str]),
}

/// Admin-only pages.
pub const ADMIN_ONLY: AccessPolicy = AccessPolicy::Roles(&[ADMIN_ROLE]);

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DenyReason {
    /// The page is for anonymous visitors but the user is logged in.
    AlreadyAuthenticated,
    /// The page requires a login.
    Unauthenticated,
    /// The user is logged in but holds none of the allowed roles.
    MissingRole,
}

impl DenyReason {
    /// Location the denied request is redirected to.
    pub fn redirect_to(self) -> &'static str {
        match self {
            DenyReason::AlreadyAuthenticated => "/",
            DenyReason::Unauthenticated => "/login/",
            DenyReason::MissingRole => "/user/",
        }
    }

    /// Flash message shown after the redirect, if any.
    pub fn message(self) -> Option<&'static str> {
        match self {
            DenyReason::AlreadyAuthenticated => None,
            DenyReason::Unauthenticated => Some("Please log in to continue."),
            DenyReason::MissingRole => Some("You are not authorized to view this page."),
        }
    }
}

/// Outcome of evaluating an [`AccessPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    /// Convert the decision into a `Result` so callers can use `?`.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            AccessDecision::Allow => Ok(()),
            AccessDecision::Deny(reason) => Err(reason),
        }
    }
}

/// Evaluate `policy` for the (possibly anonymous) requester.
pub fn authorize(user: Option<&AuthenticatedUser>, policy: AccessPolicy) -> AccessDecision {
    match (policy, user) {
        (AccessPolicy::AnonymousOnly, None) => AccessDecision::Allow,
        (AccessPolicy::AnonymousOnly, Some(_)) => {
            AccessDecision::Deny(DenyReason::AlreadyAuthenticated)
        }
        (AccessPolicy::Authenticated, Some(_)) => AccessDecision::Allow,
        (AccessPolicy::Authenticated | AccessPolicy::Roles(_), None) => {
            AccessDecision::Deny(DenyReason::Unauthenticated)
        }
        (AccessPolicy::Roles(allowed), Some(user)) => {
            if allowed.iter().any(|role| user.has_role(role)) {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::MissingRole)
            }
        }
    }
}
