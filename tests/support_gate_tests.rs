//! Support lookup gate contract tests
//!
//! Drives the router in-process; no network or database required.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use backoffice::api::{create_router, AppState};
use backoffice::auth::{LocalIdentityProvider, SessionContext};
use backoffice::config::Config;
use backoffice::store::{MemoryProfiles, MemorySupport, SupportRecord};

const API_KEY: &str = "test-secret-key";

struct App {
    router: Router,
    support: MemorySupport,
    _dir: tempfile::TempDir,
}

fn known_record() -> SupportRecord {
    SupportRecord {
        support_id: "sup-1001".to_string(),
        client_name: "Alice Martins".to_string(),
        company_name: "Martins Refrigeração".to_string(),
        document: "12.345.678/0001-90".to_string(),
    }
}

fn build_app(api_key: &str) -> App {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut config = Config::default();
    config.support.api_key = api_key.to_string();

    let support = MemorySupport::new();
    support.insert(known_record());

    let state = Arc::new(AppState {
        session: SessionContext::new(dir.path().join("profile.json")),
        provider: Arc::new(LocalIdentityProvider::new(
            Vec::new(),
            config.auth.jwt_secret.clone(),
            dir.path().join("session.json"),
        )),
        profiles: Arc::new(MemoryProfiles::new()),
        support: Arc::new(support.clone()),
        config,
    });

    App {
        router: create_router(state),
        support,
        _dir: dir,
    }
}

fn request(method: &str, path: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.expect("response");
    let status = response.status();

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(
        content_type.starts_with("application/json"),
        "gate must answer JSON, got '{}'",
        content_type
    );

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

#[tokio::test]
async fn test_disallowed_verb_is_405() {
    let app = build_app(API_KEY);

    let (status, body) = send(&app.router, request("PATCH", "/api/sup-1001", Some(API_KEY))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Método não permitido");
}

#[tokio::test]
async fn test_all_four_verbs_answer_the_lookup() {
    let app = build_app(API_KEY);

    for method in ["GET", "POST", "PUT", "DELETE"] {
        let (status, body) =
            send(&app.router, request(method, "/api/sup-1001", Some(API_KEY))).await;
        assert_eq!(status, StatusCode::OK, "{} must be accepted", method);
        assert_eq!(body["support_id"], "sup-1001");
    }
}

#[tokio::test]
async fn test_missing_authorization_header_is_401() {
    let app = build_app(API_KEY);

    let (status, body) = send(&app.router, request("GET", "/api/sup-1001", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Não autorizado");
}

#[tokio::test]
async fn test_malformed_authorization_scheme_is_401() {
    let app = build_app(API_KEY);

    let req = Request::builder()
        .method("GET")
        .uri("/api/sup-1001")
        .header(header::AUTHORIZATION, format!("Basic {}", API_KEY))
        .body(Body::empty())
        .expect("request");

    let (status, body) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Não autorizado");
}

#[tokio::test]
async fn test_wrong_secret_is_401_regardless_of_path() {
    let app = build_app(API_KEY);

    for path in ["/api/sup-1001", "/api/does-not-exist"] {
        let (status, body) = send(&app.router, request("GET", path, Some("wrong-key"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Chave API inválida", "path {}", path);
    }
}

#[tokio::test]
async fn test_empty_configured_key_rejects_empty_bearer() {
    let app = build_app("");

    let (status, body) = send(&app.router, request("GET", "/api/sup-1001", Some(""))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Chave API inválida");
}

#[tokio::test]
async fn test_unknown_support_id_is_401_not_404() {
    let app = build_app(API_KEY);

    let (status, body) = send(
        &app.router,
        request("GET", "/api/does-not-exist", Some(API_KEY)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "ID de suporte inválido");
}

#[tokio::test]
async fn test_lookup_error_collapses_into_unauthorized() {
    let app = build_app(API_KEY);
    app.support.set_failing(true);

    let (status, body) = send(&app.router, request("GET", "/api/sup-1001", Some(API_KEY))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "ID de suporte inválido");
}

#[tokio::test]
async fn test_known_support_id_returns_exactly_four_fields() {
    let app = build_app(API_KEY);

    let (status, body) = send(&app.router, request("GET", "/api/sup-1001", Some(API_KEY))).await;
    assert_eq!(status, StatusCode::OK);

    let object = body.as_object().expect("object body");
    assert_eq!(object.len(), 4, "no extra fields on the wire");
    assert_eq!(body["support_id"], "sup-1001");
    assert_eq!(body["client_name"], "Alice Martins");
    assert_eq!(body["company_name"], "Martins Refrigeração");
    assert_eq!(body["document"], "12.345.678/0001-90");
}

#[tokio::test]
async fn test_repeated_lookup_is_idempotent() {
    let app = build_app(API_KEY);

    let (first_status, first) =
        send(&app.router, request("GET", "/api/sup-1001", Some(API_KEY))).await;
    let (second_status, second) =
        send(&app.router, request("GET", "/api/sup-1001", Some(API_KEY))).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(first_status, second_status);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_health_route_is_not_shadowed_by_the_gate() {
    let app = build_app(API_KEY);

    let (status, body) = send(&app.router, request("GET", "/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
