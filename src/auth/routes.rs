//! Declarative route table and guard
//!
//! Authorization policy lives in one table; the guard is a pure function
//! of the current session snapshot and is re-evaluated on every call.

use crate::auth::models::{Profile, Role};

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable without a session
    Public,
    /// Any active signed-in profile
    Authenticated,
    /// Active profiles with the admin role only
    Admin,
}

/// One entry of the route table
#[derive(Debug)]
pub struct Route {
    pub path: &'static str,
    pub access: RouteAccess,
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Route {}

/// Where an unauthenticated visitor lands
pub const LOGIN_ROUTE: &str = "/login";

/// Safe default for authenticated visitors on unmatched paths
pub const DEFAULT_ROUTE: &str = "/services";

/// The application route table
pub const ROUTES: &[Route] = &[
    Route { path: "/login", access: RouteAccess::Public },
    Route { path: "/reset-password", access: RouteAccess::Public },
    Route { path: "/services", access: RouteAccess::Authenticated },
    Route { path: "/clients", access: RouteAccess::Authenticated },
    Route { path: "/financial", access: RouteAccess::Authenticated },
    Route { path: "/loyalty", access: RouteAccess::Authenticated },
    Route { path: "/collaborators", access: RouteAccess::Authenticated },
    Route { path: "/settings", access: RouteAccess::Authenticated },
    Route { path: "/manual", access: RouteAccess::Authenticated },
    Route { path: "/support", access: RouteAccess::Authenticated },
    Route { path: "/categories", access: RouteAccess::Admin },
    Route { path: "/products", access: RouteAccess::Admin },
    Route { path: "/requests", access: RouteAccess::Admin },
    Route { path: "/users", access: RouteAccess::Admin },
    Route { path: "/logs", access: RouteAccess::Admin },
];

/// Outcome of resolving a path against the current session
#[derive(Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Resolved(&'static Route),
    RedirectToLogin,
    RedirectToDefault,
}

/// Resolve a path for the given session snapshot.
///
/// Without an active profile only public routes resolve and everything
/// else redirects to login. With one, the visible set is the base routes
/// plus, for admins, the admin routes; unmatched paths (including public
/// ones) fall through to the default route.
pub fn resolve(current: Option<&Profile>, path: &str) -> RouteDecision {
    let route = ROUTES.iter().find(|r| r.path == path);

    let profile = match current {
        Some(p) if p.active => p,
        _ => {
            return match route {
                Some(r) if r.access == RouteAccess::Public => RouteDecision::Resolved(r),
                _ => RouteDecision::RedirectToLogin,
            };
        }
    };

    match route {
        Some(r) => match r.access {
            RouteAccess::Authenticated => RouteDecision::Resolved(r),
            RouteAccess::Admin if profile.role == Role::Admin => RouteDecision::Resolved(r),
            // Admin-only paths are absent from a user's route table, and
            // public pages are not part of the signed-in shell.
            RouteAccess::Admin | RouteAccess::Public => RouteDecision::RedirectToDefault,
        },
        None => RouteDecision::RedirectToDefault,
    }
}

/// The routes visible to a session snapshot, in table order
pub fn visible_routes(current: Option<&Profile>) -> Vec<&'static Route> {
    ROUTES
        .iter()
        .filter(|r| matches!(resolve(current, r.path), RouteDecision::Resolved(_)))
        .collect()
}
