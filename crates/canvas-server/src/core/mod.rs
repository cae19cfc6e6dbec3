//! Core Service Layer
//!
//! Shared infrastructure for the canvas server: authentication, request
//! context, configuration, errors and storage.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod payload;
pub mod router;
pub mod store;

// Re-exports for convenience
pub use config::{AppState, ServerConfig};
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use payload::Payload;
pub use router::router;
