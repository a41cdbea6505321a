//! API route handlers for the auth flow

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::server::SharedState;
use crate::auth::Profile;
use crate::error::Error;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// Health check

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok("healthy"))
}

// Auth flow

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let auth = match state
        .provider
        .sign_in_with_password(&req.email, &req.password)
        .await
    {
        Ok(auth) => auth,
        Err(Error::InvalidCredentials) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::err(
                    "Email ou senha incorretos. Verifique suas credenciais.",
                )),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Sign-in failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err("Erro ao fazer login. Tente novamente.")),
            )
                .into_response();
        }
    };

    // Fail closed: a profile we cannot resolve grants nothing.
    match state.profiles.fetch_profile(auth.subject).await {
        Ok(Some(profile)) => {
            state.session.set(profile.clone());
            (
                StatusCode::OK,
                Json(ApiResponse::ok(LoginResponse {
                    token: auth.access_token,
                    profile,
                })),
            )
                .into_response()
        }
        Ok(None) | Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::err(
                "Erro ao carregar perfil do usuário. Tente novamente.",
            )),
        )
            .into_response(),
    }
}

pub async fn logout(State(state): State<SharedState>) -> impl IntoResponse {
    if let Err(e) = state.provider.sign_out().await {
        // The local session ends regardless.
        tracing::warn!("Provider sign-out failed: {}", e);
    }
    state.session.clear();

    Json(ApiResponse::ok("Sessão encerrada"))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> impl IntoResponse {
    let redirect = state.config.auth.reset_redirect.clone();
    if let Err(e) = state
        .provider
        .reset_password_for_email(&req.email, &redirect)
        .await
    {
        tracing::warn!("Password reset request failed: {}", e);
    }

    // Uniform response; the endpoint does not confirm account existence.
    Json(ApiResponse::ok(
        "Email de recuperação enviado! Verifique sua caixa de entrada.",
    ))
}

pub async fn me(State(state): State<SharedState>) -> impl IntoResponse {
    match state.session.current() {
        Some(profile) => (StatusCode::OK, Json(ApiResponse::ok(profile))).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::err("Não autenticado")),
        )
            .into_response(),
    }
}
