//! Credential primitives: redacted secrets and the cached access token.

pub mod secret;
pub mod token;

pub use secret::*;
pub use token::*;
