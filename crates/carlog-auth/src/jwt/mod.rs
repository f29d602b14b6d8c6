//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod service;

pub use claims::{Claims, TokenClass};
pub use decoder::{JwtDecoder, UnverifiedSubject};
pub use encoder::{IssuedToken, JwtEncoder};
pub use error::TokenError;
pub use service::TokenService;
