//! In-memory stores for tests and local deployments

use crate::auth::Profile;
use crate::error::{Error, Result};
use crate::store::{ProfileStore, SupportRecord, SupportStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory profile store
#[derive(Clone, Default)]
pub struct MemoryProfiles {
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
    fail: Arc<RwLock<bool>>,
}

impl MemoryProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: Profile) {
        self.profiles
            .write()
            .expect("profile store lock poisoned")
            .insert(profile.id, profile);
    }

    /// Make every fetch fail, to exercise fail-closed paths
    pub fn set_failing(&self, fail: bool) {
        *self.fail.write().expect("profile store lock poisoned") = fail;
    }
}

#[async_trait]
impl ProfileStore for MemoryProfiles {
    async fn fetch_profile(&self, id: Uuid) -> Result<Option<Profile>> {
        if *self.fail.read().expect("profile store lock poisoned") {
            return Err(Error::Other("profile store unavailable".to_string()));
        }
        Ok(self
            .profiles
            .read()
            .expect("profile store lock poisoned")
            .get(&id)
            .cloned())
    }
}

/// In-memory support credential store
#[derive(Clone, Default)]
pub struct MemorySupport {
    records: Arc<RwLock<HashMap<String, SupportRecord>>>,
    fail: Arc<RwLock<bool>>,
}

impl MemorySupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: SupportRecord) {
        self.records
            .write()
            .expect("support store lock poisoned")
            .insert(record.support_id.clone(), record);
    }

    /// Make every lookup fail, to exercise the gate's error collapse
    pub fn set_failing(&self, fail: bool) {
        *self.fail.write().expect("support store lock poisoned") = fail;
    }
}

#[async_trait]
impl SupportStore for MemorySupport {
    async fn lookup(&self, support_id: &str) -> Result<Option<SupportRecord>> {
        if *self.fail.read().expect("support store lock poisoned") {
            return Err(Error::Other("support store unavailable".to_string()));
        }
        Ok(self
            .records
            .read()
            .expect("support store lock poisoned")
            .get(support_id)
            .cloned())
    }
}
