//! Authentication, session state and route authorization

pub mod bootstrap;
pub mod http;
pub mod jwt;
pub mod local;
pub mod models;
pub mod provider;
pub mod routes;
pub mod session;

pub use bootstrap::{bootstrap, spawn_listener};
pub use http::HttpIdentityProvider;
pub use jwt::{create_token, validate_token, Claims};
pub use local::LocalIdentityProvider;
pub use models::{AuthEvent, AuthSession, Profile, Role};
pub use provider::IdentityProvider;
pub use routes::{resolve, Route, RouteAccess, RouteDecision, DEFAULT_ROUTE, LOGIN_ROUTE, ROUTES};
pub use session::SessionContext;
