//! Auth Handlers

pub mod auth;
pub mod auth_me;

pub use auth::{login, register};
pub use auth_me::profile;
