//! Session identity of a logged-in user.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;

/// User details stored in the session identity after a successful login.
///
/// Handlers extract it as `Option<AuthenticatedUser>` so that anonymous requests
/// reach the access policy instead of failing extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identifier of the `users` row.
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Role names held at login time.
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Returns `true` when the user holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held == role)
    }

    /// Serialize the user into the string stored by `actix-identity`.
    pub fn to_identity(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a user from the string stored by `actix-identity`.
    pub fn from_identity(identity: &str) -> serde_json::Result<Self> {
        serde_json::from_str(identity)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            username: value.username.clone(),
            email: value.email.clone(),
            roles: value.roles.clone(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .get_identity()
            .map_err(ErrorUnauthorized)
            .and_then(|identity| identity.id().map_err(ErrorUnauthorized))
            .and_then(|raw| Self::from_identity(&raw).map_err(ErrorUnauthorized));

        ready(result)
    }
}
