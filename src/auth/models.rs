//! Identity models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Profile roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator - base routes plus admin routes
    Admin,
    /// Regular user - base routes only
    User,
}

impl Role {
    /// Parse a role from its database representation.
    /// Unknown values collapse to the least-privileged role.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// Identity record mirrored read-only into the session context.
/// Owned by the identity provider / profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Profile {
    /// Create a new profile
    pub fn new(email: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            role,
            active: true,
            created_at: Utc::now(),
        }
    }

    /// Check if the profile holds admin rights
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin && self.active
    }
}

/// A live session at the identity provider.
/// Everything but `subject` is opaque to the rest of the crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Profile id this session belongs to
    pub subject: Uuid,
    pub email: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Session-change notification pushed by the identity provider
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(AuthSession),
    SignedOut,
}
