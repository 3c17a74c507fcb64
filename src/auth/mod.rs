pub mod jwks;
pub mod jwt;
pub mod middleware;

pub use jwt::{AuthError, Claims, SecretVerifier, SessionVerifier, SharedVerifier};
