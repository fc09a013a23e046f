//! HTTP API layer for the token gateway.
//!
//! Provides the health endpoint and the token-protected caller-info endpoint.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
