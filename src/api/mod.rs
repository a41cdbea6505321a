//! HTTP API server

pub mod routes;
pub mod server;
pub mod support;

pub use server::*;
