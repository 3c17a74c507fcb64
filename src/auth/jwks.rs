use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::jwt::{AuthError, Claims, SessionVerifier};

const KEY_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone)]
enum JwkMaterial {
    Ec { x: String, y: String },
    Rsa { n: String, e: String },
}

#[derive(Clone)]
struct JwksKeyData {
    material: JwkMaterial,
    algorithm: Algorithm,
}

impl JwksKeyData {
    fn decoding_key(&self) -> Result<DecodingKey, AuthError> {
        let key = match &self.material {
            JwkMaterial::Ec { x, y } => DecodingKey::from_ec_components(x, y)?,
            JwkMaterial::Rsa { n, e } => DecodingKey::from_rsa_components(n, e)?,
        };
        Ok(key)
    }
}

/// Verifies session tokens against the session provider's published key set.
///
/// Keys are cached per `kid` for an hour; an unknown `kid` triggers a refetch.
#[derive(Clone)]
pub struct JwksVerifier {
    cache: Arc<Cache<String, JwksKeyData>>,
    jwks_url: String,
    client: reqwest::Client,
}

impl JwksVerifier {
    pub fn new(jwks_url: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(KEY_TTL)
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: jwks_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_jwks(&self) -> Result<serde_json::Value, AuthError> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeySet(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeySet(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::KeySet(format!("invalid JSON: {e}")))
    }

    async fn get_key_data(&self, kid: &str) -> Result<JwksKeyData, AuthError> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let jwks = self.fetch_jwks().await?;
        let keys = jwks["keys"]
            .as_array()
            .ok_or_else(|| AuthError::KeySet("no keys in JWKS".to_string()))?;

        let jwk = keys
            .iter()
            .find(|k| k["kid"].as_str() == Some(kid))
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))?;

        let key_data = parse_jwk(jwk)?;
        self.cache.insert(kid.to_string(), key_data.clone()).await;
        Ok(key_data)
    }
}

fn jwk_field(jwk: &serde_json::Value, name: &str) -> Result<String, AuthError> {
    jwk[name]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AuthError::KeySet(format!("missing '{name}' in JWK")))
}

fn parse_jwk(jwk: &serde_json::Value) -> Result<JwksKeyData, AuthError> {
    match jwk["kty"].as_str().unwrap_or("EC") {
        "RSA" => {
            let algorithm = match jwk["alg"].as_str() {
                Some("RS384") => Algorithm::RS384,
                Some("RS512") => Algorithm::RS512,
                _ => Algorithm::RS256,
            };
            Ok(JwksKeyData {
                material: JwkMaterial::Rsa {
                    n: jwk_field(jwk, "n")?,
                    e: jwk_field(jwk, "e")?,
                },
                algorithm,
            })
        }
        "EC" => {
            let algorithm = match jwk["alg"].as_str() {
                Some("ES384") => Algorithm::ES384,
                _ => Algorithm::ES256,
            };
            Ok(JwksKeyData {
                material: JwkMaterial::Ec {
                    x: jwk_field(jwk, "x")?,
                    y: jwk_field(jwk, "y")?,
                },
                algorithm,
            })
        }
        other => Err(AuthError::KeySet(format!("unsupported key type {other}"))),
    }
}

#[async_trait]
impl SessionVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::UnknownKey("<none>".to_string()))?;

        let key_data = self.get_key_data(&kid).await?;
        let decoding_key = key_data.decoding_key()?;

        let mut validation = Validation::new(key_data.algorithm);
        validation.validate_aud = false;

        Ok(decode::<Claims>(token, &decoding_key, &validation)?.claims)
    }
}
