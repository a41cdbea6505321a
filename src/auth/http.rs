//! HTTP identity provider
//!
//! Talks to a GoTrue-style REST auth service. Session tokens are
//! persisted to disk so `get_session` survives a restart; the profile
//! itself is never stored here.

use crate::auth::models::{AuthEvent, AuthSession};
use crate::auth::provider::IdentityProvider;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tokio::sync::broadcast;
use uuid::Uuid;

const EVENT_CHANNEL_CAPACITY: usize = 16;

pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session_path: PathBuf,
    events: broadcast::Sender<AuthEvent>,
}

/// Token grant response from the auth service
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, anon_key: String, session_path: impl Into<PathBuf>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            session_path: session_path.into(),
            events,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
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

    fn stored_session(&self) -> Option<AuthSession> {
        let content = fs::read_to_string(&self.session_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring unreadable provider session: {}", e);
                None
            }
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
impl IdentityProvider for HttpIdentityProvider {
    async fn get_session(&self) -> Result<Option<AuthSession>> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };

        if session.is_expired() {
            self.drop_session();
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let response = self
            .http
            .post(self.endpoint("/token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::InvalidCredentials);
        }

        let grant: TokenResponse = response.json().await?;
        let session = AuthSession {
            subject: grant.user.id,
            email: grant.user.email.unwrap_or_else(|| email.to_string()),
            access_token: grant.access_token,
            expires_at: Utc::now() + Duration::seconds(grant.expires_in),
        };

        self.persist_session(&session);
        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));

        tracing::info!("Signed in {}", session.email);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(session) = self.stored_session() {
            let result = self
                .http
                .post(self.endpoint("/logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            if let Err(e) = result {
                // The local session still ends; the provider token just
                // expires on its own.
                tracing::warn!("Remote sign-out failed: {}", e);
            }
        }

        self.drop_session();
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint("/recover"))
            .header("apikey", &self.anon_key)
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({ "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Other(format!(
                "Password recovery request failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}
