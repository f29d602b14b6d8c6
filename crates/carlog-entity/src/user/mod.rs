//! User identity entity and the provider profile it is built from.

pub mod model;
pub mod profile;

pub use model::{NewUser, User};
pub use profile::ExternalProfile;
