//! # carlog-api
//!
//! HTTP API layer for Carlog built on Axum.
//!
//! Provides the provider login, refresh, logout and who-am-i endpoints, the
//! cookie-reading [`extractors::AuthUser`] extractor, request logging, CORS
//! and the mapping of domain errors to JSON responses.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
