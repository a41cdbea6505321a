//! Data access layer
//!
//! Row-level reads against the relational schema, behind traits so the
//! auth flow and the test suites can swap the backing store.

pub mod memory;
pub mod postgres;

use crate::auth::Profile;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::{MemoryProfiles, MemorySupport};
pub use postgres::{PgProfiles, PgSupport};

/// Read access to identity profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>>;
}

/// Support credentials exposed by the authorization gate.
/// Exactly these four fields go over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportRecord {
    pub support_id: String,
    pub client_name: String,
    pub company_name: String,
    pub document: String,
}

/// Read access to support credentials
#[async_trait]
pub trait SupportStore: Send + Sync {
    async fn lookup(&self, support_id: &str) -> Result<Option<SupportRecord>>;
}
