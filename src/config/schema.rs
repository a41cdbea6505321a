//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::auth::Role;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub support: SupportConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which identity provider backs the session flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Remote GoTrue-style REST provider
    Http,
    /// Config-listed users with bcrypt hashes and local JWT sessions
    #[default]
    Local,
}

/// Identity provider and session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL of the remote auth service (http provider only)
    #[serde(default)]
    pub url: String,

    /// Public API key sent as the `apikey` header (http provider only)
    #[serde(default)]
    pub anon_key: String,

    /// Secret used to sign local provider session tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Where the provider persists its session tokens across restarts
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// Where the session context persists the profile snapshot
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: PathBuf,

    /// Redirect target appended to password-reset emails
    #[serde(default = "default_reset_redirect")]
    pub reset_redirect: String,

    /// Users for the local provider
    #[serde(default)]
    pub users: Vec<LocalUser>,
}

fn default_jwt_secret() -> String {
    "backoffice-secret-change-in-production".to_string()
}

fn default_session_file() -> PathBuf {
    PathBuf::from("./.backoffice/session.json")
}

fn default_snapshot_file() -> PathBuf {
    PathBuf::from("./.backoffice/profile.json")
}

fn default_reset_redirect() -> String {
    "/update-password".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            url: String::new(),
            anon_key: String::new(),
            jwt_secret: default_jwt_secret(),
            session_file: default_session_file(),
            snapshot_file: default_snapshot_file(),
            reset_redirect: default_reset_redirect(),
            users: Vec::new(),
        }
    }
}

/// A user entry for the local identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash of the password, never the password itself
    pub password_hash: String,
    pub role: Role,
}

/// Connection settings for the relational store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default = "default_db_password")]
    pub password: String,

    #[serde(default = "default_db_name")]
    pub dbname: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_db_user() -> String {
    "postgres".to_string()
}

fn default_db_password() -> String {
    "postgres".to_string()
}

fn default_db_name() -> String {
    "backoffice".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: default_db_password(),
            dbname: default_db_name(),
        }
    }
}

impl DatabaseConfig {
    /// Connection string for tokio-postgres
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

/// Support lookup endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupportConfig {
    /// Shared secret expected in the Authorization header.
    /// Empty means the endpoint rejects every request.
    #[serde(default)]
    pub api_key: String,
}
