//! Identity provider seam

use crate::auth::models::{AuthEvent, AuthSession};
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// External identity provider.
///
/// The session flow consumes only current-session lookup, sign-out and the
/// change-event stream; the login and reset-password endpoints use the rest.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up an existing session, if the provider has one persisted.
    /// An expired session resolves to `None`, not an error.
    async fn get_session(&self) -> Result<Option<AuthSession>>;

    /// Authenticate with email and password
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;

    /// Request a password-reset email
    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()>;

    /// Subscribe to session-change notifications
    fn events(&self) -> broadcast::Receiver<AuthEvent>;
}
