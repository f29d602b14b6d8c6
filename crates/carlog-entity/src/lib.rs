//! # carlog-entity
//!
//! Entity models persisted by Carlog. Each model derives `sqlx::FromRow`
//! so repositories can map rows directly.

pub mod user;
