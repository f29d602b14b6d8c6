//! Session use cases built on top of the token service and stores.

pub mod manager;

pub use manager::{SessionGrant, SessionManager};
