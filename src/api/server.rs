//! HTTP API server

use axum::{
    routing::{any, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{
    self, HttpIdentityProvider, IdentityProvider, LocalIdentityProvider, SessionContext,
};
use crate::config::{Config, ProviderKind};
use crate::error::Result;
use crate::store::{PgProfiles, PgSupport, ProfileStore, SupportStore};

use super::{routes, support};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub session: SessionContext,
    pub provider: Arc<dyn IdentityProvider>,
    pub profiles: Arc<dyn ProfileStore>,
    pub support: Arc<dyn SupportStore>,
}

pub type SharedState = Arc<AppState>;

/// Assemble the application state from configuration
pub fn build_state(config: Config) -> SharedState {
    let session = SessionContext::new(config.auth.snapshot_file.clone());

    let provider: Arc<dyn IdentityProvider> = match config.auth.provider {
        ProviderKind::Http => Arc::new(HttpIdentityProvider::new(
            config.auth.url.clone(),
            config.auth.anon_key.clone(),
            config.auth.session_file.clone(),
        )),
        ProviderKind::Local => Arc::new(LocalIdentityProvider::new(
            config.auth.users.clone(),
            config.auth.jwt_secret.clone(),
            config.auth.session_file.clone(),
        )),
    };

    let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfiles::new(config.database.clone()));
    let support: Arc<dyn SupportStore> = Arc::new(PgSupport::new(config.database.clone()));

    Arc::new(AppState {
        config,
        session,
        provider,
        profiles,
        support,
    })
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(config);

    // One-shot session restore, then mirror provider changes continuously.
    auth::bootstrap(
        state.provider.as_ref(),
        state.profiles.as_ref(),
        &state.session,
    )
    .await;
    auth::spawn_listener(
        state.provider.clone(),
        state.profiles.clone(),
        state.session.clone(),
    );

    let app = create_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(routes::health))
        // Auth flow
        .route("/api/auth/login", post(routes::login))
        .route("/api/auth/logout", post(routes::logout))
        .route("/api/auth/reset-password", post(routes::reset_password))
        .route("/api/auth/me", get(routes::me))
        // Support lookup gate; the handler does its own method filtering
        .route("/api/{support_id}", any(support::support_lookup))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
