//! Session flow and route guard tests

use std::sync::Arc;
use std::time::Duration;

use backoffice::auth::{
    bootstrap, resolve, spawn_listener, IdentityProvider, LocalIdentityProvider, Profile, Role,
    RouteAccess, RouteDecision, SessionContext, LOGIN_ROUTE, ROUTES,
};
use backoffice::config::LocalUser;
use backoffice::store::{MemoryProfiles, ProfileStore};
use uuid::Uuid;

const PASSWORD: &str = "hunter2";

struct Fixture {
    provider: Arc<LocalIdentityProvider>,
    profiles: MemoryProfiles,
    session: SessionContext,
    user_id: Uuid,
    _dir: tempfile::TempDir,
}

fn fixture(role: Role) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let user_id = Uuid::new_v4();

    let provider = Arc::new(LocalIdentityProvider::new(
        vec![LocalUser {
            id: user_id,
            email: "alice@example.com".to_string(),
            password_hash: bcrypt::hash(PASSWORD, 4).expect("hash"),
            role,
        }],
        "test-secret".to_string(),
        dir.path().join("session.json"),
    ));

    let profiles = MemoryProfiles::new();
    let mut profile = Profile::new("alice@example.com".to_string(), role);
    profile.id = user_id;
    profiles.insert(profile);

    let session = SessionContext::new(dir.path().join("profile.json"));

    Fixture {
        provider,
        profiles,
        session,
        user_id,
        _dir: dir,
    }
}

async fn wait_for_change(rx: &mut tokio::sync::watch::Receiver<Option<Profile>>) {
    tokio::time::timeout(Duration::from_secs(2), rx.changed())
        .await
        .expect("timed out waiting for session change")
        .expect("session channel closed");
}

// Bootstrap scenarios

#[tokio::test]
async fn test_bootstrap_without_provider_session_leaves_session_empty() {
    let f = fixture(Role::User);

    bootstrap(f.provider.as_ref(), &f.profiles, &f.session).await;

    assert!(f.session.current().is_none());
    assert_eq!(resolve(None, "/"), RouteDecision::RedirectToLogin);
}

#[tokio::test]
async fn test_bootstrap_installs_profile_for_existing_session() {
    let f = fixture(Role::User);
    f.provider
        .sign_in_with_password("alice@example.com", PASSWORD)
        .await
        .expect("sign in");

    bootstrap(f.provider.as_ref(), &f.profiles, &f.session).await;

    let current = f.session.current().expect("profile installed");
    assert_eq!(current.id, f.user_id);
}

#[tokio::test]
async fn test_bootstrap_fails_closed_on_profile_fetch_error() {
    let f = fixture(Role::User);
    f.provider
        .sign_in_with_password("alice@example.com", PASSWORD)
        .await
        .expect("sign in");
    f.profiles.set_failing(true);

    bootstrap(f.provider.as_ref(), &f.profiles, &f.session).await;

    // Identical outward behavior to "no session".
    assert!(f.session.current().is_none());
}

#[tokio::test]
async fn test_bootstrap_fails_closed_on_missing_profile() {
    let f = fixture(Role::User);
    f.provider
        .sign_in_with_password("alice@example.com", PASSWORD)
        .await
        .expect("sign in");
    let empty = MemoryProfiles::new();

    bootstrap(f.provider.as_ref(), &empty, &f.session).await;

    assert!(f.session.current().is_none());
}

// Provider event listener

#[tokio::test]
async fn test_listener_installs_profile_on_sign_in() {
    let f = fixture(Role::Admin);
    let handle = spawn_listener(
        f.provider.clone() as Arc<dyn IdentityProvider>,
        Arc::new(f.profiles.clone()) as Arc<dyn ProfileStore>,
        f.session.clone(),
    );

    let mut rx = f.session.subscribe();
    f.provider
        .sign_in_with_password("alice@example.com", PASSWORD)
        .await
        .expect("sign in");

    wait_for_change(&mut rx).await;
    assert_eq!(f.session.current().map(|p| p.id), Some(f.user_id));

    handle.abort();
}

#[tokio::test]
async fn test_listener_clears_session_on_sign_out() {
    let f = fixture(Role::User);
    let handle = spawn_listener(
        f.provider.clone() as Arc<dyn IdentityProvider>,
        Arc::new(f.profiles.clone()) as Arc<dyn ProfileStore>,
        f.session.clone(),
    );

    let mut rx = f.session.subscribe();
    f.provider
        .sign_in_with_password("alice@example.com", PASSWORD)
        .await
        .expect("sign in");
    wait_for_change(&mut rx).await;

    f.provider.sign_out().await.expect("sign out");
    wait_for_change(&mut rx).await;

    // After sign-out, only public routes resolve for any path.
    let current = f.session.current();
    assert!(current.is_none());
    for route in ROUTES {
        let decision = resolve(current.as_ref(), route.path);
        match route.access {
            RouteAccess::Public => assert!(matches!(decision, RouteDecision::Resolved(_))),
            _ => assert_eq!(decision, RouteDecision::RedirectToLogin),
        }
    }

    handle.abort();
}

// Route guard properties

#[test]
fn test_user_never_resolves_admin_paths() {
    let user = Profile::new("user@example.com".to_string(), Role::User);
    for route in ROUTES.iter().filter(|r| r.access == RouteAccess::Admin) {
        assert_eq!(
            resolve(Some(&user), route.path),
            RouteDecision::RedirectToDefault,
            "user must not resolve {}",
            route.path
        );
    }
}

#[test]
fn test_admin_resolves_base_and_admin_paths() {
    let admin = Profile::new("admin@example.com".to_string(), Role::Admin);
    for route in ROUTES
        .iter()
        .filter(|r| r.access != RouteAccess::Public)
    {
        assert!(
            matches!(resolve(Some(&admin), route.path), RouteDecision::Resolved(_)),
            "admin must resolve {}",
            route.path
        );
    }
}

#[test]
fn test_guard_reads_fresh_snapshot_after_clear() {
    let dir = tempfile::tempdir().expect("tempdir");
    let session = SessionContext::new(dir.path().join("profile.json"));
    session.set(Profile::new("admin@example.com".to_string(), Role::Admin));
    assert!(matches!(
        resolve(session.current().as_ref(), "/users"),
        RouteDecision::Resolved(_)
    ));

    session.clear();
    for route in ROUTES {
        let decision = resolve(session.current().as_ref(), route.path);
        if route.access == RouteAccess::Public {
            assert!(matches!(decision, RouteDecision::Resolved(_)));
        } else {
            assert_eq!(decision, RouteDecision::RedirectToLogin);
        }
    }
}

#[test]
fn test_login_route_constant_is_public() {
    assert!(matches!(
        resolve(None, LOGIN_ROUTE),
        RouteDecision::Resolved(_)
    ));
}

// Session persistence across restarts

#[tokio::test]
async fn test_session_and_snapshot_survive_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot = dir.path().join("profile.json");

    let profile = Profile::new("alice@example.com".to_string(), Role::User);
    {
        let session = SessionContext::new(&snapshot);
        session.set(profile.clone());
    }

    // A fresh context over the same path restores the profile before any
    // bootstrap runs.
    let restored = SessionContext::new(&snapshot);
    assert_eq!(restored.current(), Some(profile));
}
