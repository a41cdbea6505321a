//! JWT token handling for the local identity provider

use crate::auth::models::Role;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token lifetime in seconds
const TOKEN_TTL_SECS: i64 = 3600;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (profile ID)
    pub sub: Uuid,
    /// Email of the signed-in user
    pub email: String,
    /// Role at sign-in time
    pub role: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject
    pub fn new(sub: Uuid, email: &str, role: Role) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub,
            email: email.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        }
    }

    /// Get the role carried by the token
    pub fn get_role(&self) -> Role {
        Role::from_db(&self.role)
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }
}

/// Create a signed session token
pub fn create_token(sub: Uuid, email: &str, role: Role, secret: &str) -> Result<String> {
    let claims = Claims::new(sub, email, role);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Token(format!("Failed to create token: {}", e)))
}

/// Validate and decode a session token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| Error::Token(format!("Invalid token: {}", e)))
}
