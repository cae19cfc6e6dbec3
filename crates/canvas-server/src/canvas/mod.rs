//! Canvas documents: model, access rules, repository and HTTP handlers.

pub mod access;
pub mod handlers;
pub mod models;
pub mod repository;

pub use access::Access;
pub use models::{Canvas, CanvasSummary};
pub use repository::CanvasRepository;
