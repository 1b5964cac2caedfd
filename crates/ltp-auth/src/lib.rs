//! Request authentication for the price provider.
//!
//! Builds the header set attached to every outbound provider request,
//! dispatching on the configured `AuthMethod` (bearer, HMAC-signed, or
//! basic).

pub mod authenticator;
pub mod error;

pub use authenticator::Authenticator;
pub use error::{AuthError, AuthResult};
