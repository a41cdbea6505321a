//! Local identity provider
//!
//! Authenticates against users listed in the configuration and issues
//! JWT sessions signed with the configured secret. Used for self-hosted
//! deployments without a remote auth service, and by the test suites.

use crate::auth::jwt;
use crate::auth::models::{AuthEvent, AuthSession};
use crate::auth::provider::IdentityProvider;
use crate::config::LocalUser;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

pub struct LocalIdentityProvider {
    users: Vec<LocalUser>,
    jwt_secret: String,
    session_path: PathBuf,
    events: broadcast::Sender<AuthEvent>,
}

impl LocalIdentityProvider {
    pub fn new(users: Vec<LocalUser>, jwt_secret: String, session_path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            users,
            jwt_secret,
            session_path: session_path.into(),
            events,
        }
    }

    fn find_user(&self, email: &str) -> Option<&LocalUser> {
        self.users.iter().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    fn persist_session(&self, session: &AuthSession) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.session_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string(session)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            fs::write(&self.session_path, content)
        };

        if let Err(e) = write() {
            tracing::warn!("Failed to persist provider session: {}", e);
        }
    }

    fn drop_session(&self) {
        if let Err(e) = fs::remove_file(&self.session_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove provider session: {}", e);
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn get_session(&self) -> Result<Option<AuthSession>> {
        let content = match fs::read_to_string(&self.session_path) {
            Ok(content) => content,
            Err(_) => return Ok(None),
        };

        let session: AuthSession = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring unreadable provider session: {}", e);
                self.drop_session();
                return Ok(None);
            }
        };

        // Validate the stored token; a stale or tampered token signs out.
        if jwt::validate_token(&session.access_token, &self.jwt_secret).is_err() {
            self.drop_session();
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let user = self.find_user(email).ok_or(Error::InvalidCredentials)?;

        let verified =
            bcrypt::verify(password, &user.password_hash).map_err(|_| Error::InvalidCredentials)?;
        if !verified {
            return Err(Error::InvalidCredentials);
        }

        let token = jwt::create_token(user.id, &user.email, user.role, &self.jwt_secret)?;
        let claims = jwt::validate_token(&token, &self.jwt_secret)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| Error::Token("Invalid expiry timestamp".to_string()))?;

        let session = AuthSession {
            subject: user.id,
            email: user.email.clone(),
            access_token: token,
            expires_at,
        };

        self.persist_session(&session);
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));

        tracing::info!("Signed in {}", session.email);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.drop_session();
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()> {
        // No mail transport in local mode; operators rotate hashes in config.
        tracing::info!(
            "Password reset requested for {} (redirect {})",
            email,
            redirect_to
        );
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
