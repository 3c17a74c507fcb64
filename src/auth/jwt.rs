use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Wallet session claims.
///
/// The session provider signs a JWT once the wallet has proven ownership of its
/// address. `sub` is the user's UUID; the remaining fields are display hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The user UUID.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    /// Public address of the connected wallet.
    pub wallet: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|e| AuthError::Subject(e.to_string()))
    }

    pub fn display_name(&self) -> Option<String> {
        self.name.clone().filter(|n| !n.trim().is_empty())
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.picture.clone().filter(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to fetch key set: {0}")]
    KeySet(String),

    #[error("Key with kid={0} not found in key set")]
    UnknownKey(String),

    #[error("Token validation failed: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid UUID in sub claim: {0}")]
    Subject(String),
}

/// Verifies a bearer token and returns its claims.
///
/// Stored in app data as [`SharedVerifier`] so tests can swap the JWKS-backed
/// verifier for a shared-secret one.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

pub type SharedVerifier = Arc<dyn SessionVerifier>;

/// HS256 verification against a secret shared with the session provider.
#[derive(Clone)]
pub struct SecretVerifier {
    key: DecodingKey,
}

impl SecretVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn verify_sync(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Ok(decode::<Claims>(token, &self.key, &validation)?.claims)
    }
}

#[async_trait]
impl SessionVerifier for SecretVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_sync(token)
    }
}
