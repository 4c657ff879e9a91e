use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::users::Roles;

/// Claims issued by the identity provider.
///
/// The `sub` field is the user's UUID; `role` is the platform role the
/// provider assigned at registration. We validate the signature and map the
/// claims onto a local `users` row — issuance itself happens elsewhere.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// User's email.
    pub email: Option<String>,
    /// Platform role: "client", "freelancer" or "admin".
    pub role: Option<String>,
    /// Display name, if the provider knows one.
    pub name: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    /// The platform role carried in the token; unrecognized or missing
    /// values default to Client.
    pub fn platform_role(&self) -> Roles {
        match self.role.as_deref() {
            Some("freelancer") => Roles::Freelancer,
            Some("admin") => Roles::Admin,
            _ => Roles::Client,
        }
    }
}

/// Validate an HS256 token against the shared secret and return the claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Token validation failed: {e:?}"))
}
