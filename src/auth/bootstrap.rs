//! Session bootstrapping
//!
//! One-shot restore of an existing provider session at startup, plus the
//! standing listener that mirrors provider session changes into the
//! session context. Both producers converge on the same profile for a
//! valid session; last write wins.

use crate::auth::models::{AuthEvent, AuthSession};
use crate::auth::provider::IdentityProvider;
use crate::auth::session::SessionContext;
use crate::store::ProfileStore;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Run the one-shot session bootstrap.
///
/// Fails closed: any provider or profile-store error leaves the session
/// context untouched and the user lands on login. No retry.
pub async fn bootstrap(
    provider: &dyn IdentityProvider,
    profiles: &dyn ProfileStore,
    session: &SessionContext,
) {
    let auth = match provider.get_session().await {
        Ok(Some(auth)) => auth,
        Ok(None) => {
            tracing::debug!("No provider session; session stays empty");
            return;
        }
        Err(e) => {
            tracing::warn!("Session lookup failed: {}", e);
            return;
        }
    };

    install_profile(profiles, session, &auth).await;
}

/// Spawn the standing subscription to provider session changes
pub fn spawn_listener(
    provider: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    session: SessionContext,
) -> JoinHandle<()> {
    let mut events = provider.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(AuthEvent::SignedOut) => {
                    tracing::info!("Provider signed out; clearing session");
                    session.clear();
                }
                Ok(AuthEvent::SignedIn(auth)) => {
                    install_profile(profiles.as_ref(), &session, &auth).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Auth event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Resolve the profile behind a provider session and install it.
/// A failed or empty lookup installs nothing.
async fn install_profile(
    profiles: &dyn ProfileStore,
    session: &SessionContext,
    auth: &AuthSession,
) {
    match profiles.fetch_profile(auth.subject).await {
        Ok(Some(profile)) => {
            tracing::info!("Session established for {}", profile.email);
            session.set(profile);
        }
        Ok(None) => {
            tracing::warn!("No profile for subject {}", auth.subject);
        }
        Err(e) => {
            tracing::warn!("Profile fetch for {} failed: {}", auth.subject, e);
        }
    }
}
