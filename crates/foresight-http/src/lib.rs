//! # Foresight HTTP
//!
//! The external surface of the platform: per-domain score / batch /
//! history endpoints, tenant header extraction, error mapping, health
//! reporting, and the server binary's bootstrap pieces.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod shutdown;
pub mod state;

pub use config::{BootstrapError, ServerConfig, build_state};
pub use error::ApiError;
pub use router::router;
pub use state::AppState;
