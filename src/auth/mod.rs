//! Token authentication for the gateway.
//!
//! Provides two bearer-style schemes sharing one contract:
//! - SecureToken: static shared-secret for service-to-service clients
//! - UserToken: delegated validation against a remote authorization service

mod middleware;
mod scheme;
mod secure_token;
mod user_token;

pub use middleware::*;
pub use scheme::*;
pub use secure_token::*;
pub use user_token::*;
