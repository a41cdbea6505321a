//! Process-wide session state

use crate::auth::models::Profile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

/// Durable snapshot of the signed-in profile. Holds the profile only,
/// never provider credentials.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    profile: Profile,
    saved_at: chrono::DateTime<chrono::Utc>,
}

/// Holder of the current profile, shared by every route-gated component.
///
/// Exactly two producers write here (the bootstrapper and the provider
/// event listener); writes are last-write-wins. The held profile is
/// written through to a snapshot file so it survives a restart.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    tx: watch::Sender<Option<Profile>>,
    snapshot_path: PathBuf,
}

impl SessionContext {
    /// Create a session context, restoring a surviving snapshot if one
    /// parses. A missing or corrupt snapshot yields an empty session.
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        let snapshot_path = snapshot_path.into();
        let restored = load_snapshot(&snapshot_path);
        let (tx, _rx) = watch::channel(restored);
        Self {
            inner: Arc::new(Inner { tx, snapshot_path }),
        }
    }

    /// Current profile, if any
    pub fn current(&self) -> Option<Profile> {
        self.inner.tx.borrow().clone()
    }

    /// Install a profile and notify observers
    pub fn set(&self, profile: Profile) {
        write_snapshot(&self.inner.snapshot_path, &profile);
        self.inner.tx.send_replace(Some(profile));
    }

    /// Remove the profile, drop the snapshot and notify observers.
    /// Observers seeing `None` treat it as a forced return to login.
    pub fn clear(&self) {
        remove_snapshot(&self.inner.snapshot_path);
        self.inner.tx.send_replace(None);
    }

    /// Subscribe to profile changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.inner.tx.subscribe()
    }
}

fn load_snapshot(path: &Path) -> Option<Profile> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Snapshot>(&content) {
        Ok(snapshot) => Some(snapshot.profile),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session snapshot {}: {}", path.display(), e);
            None
        }
    }
}

fn write_snapshot(path: &Path, profile: &Profile) {
    let snapshot = Snapshot {
        profile: profile.clone(),
        saved_at: chrono::Utc::now(),
    };

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)
    };

    if let Err(e) = write() {
        tracing::warn!("Failed to persist session snapshot {}: {}", path.display(), e);
    }
}

fn remove_snapshot(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove session snapshot {}: {}", path.display(), e);
        }
    }
}
