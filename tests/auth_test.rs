///! Integration test for wallet session verification.
///!
///! Mints session tokens locally with the same HS256 secret the server would be
///! configured with, then checks them through `SecretVerifier`.
///! No running server or database is needed.
///!
///! Run with: `cargo test --test auth_test`
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use soleer_marketplace::auth::{AuthError, Claims, SecretVerifier, SessionVerifier};

/// A fake secret for testing; never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

/// Helper: a session for a connected wallet, valid for one hour.
fn session_claims(sub: &str, wallet: &str, name: &str) -> Claims {
    let now = Utc::now().timestamp() as usize;
    Claims {
        sub: sub.to_string(),
        exp: now + 3600,
        iat: Some(now),
        wallet: Some(wallet.to_string()),
        name: Some(name.to_string()),
        picture: Some("https://example.com/avatar.png".to_string()),
    }
}

#[tokio::test]
async fn test_valid_token_decodes_correctly() {
    let user_id = Uuid::new_v4();
    let token = sign(
        &session_claims(&user_id.to_string(), "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", "Alice"),
        TEST_SECRET,
    );

    let verifier = SecretVerifier::new(TEST_SECRET);
    let claims = verifier.verify(&token).await.expect("Token should be valid");

    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(
        claims.wallet.as_deref(),
        Some("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU")
    );
    assert_eq!(claims.display_name().unwrap(), "Alice");
    assert_eq!(claims.avatar_url().unwrap(), "https://example.com/avatar.png");
}

#[test]
fn test_expired_token_is_rejected() {
    let now = Utc::now().timestamp() as usize;
    let mut claims = session_claims(&Uuid::new_v4().to_string(), "wallet", "Bob");
    // Expired 5 minutes ago (well past the 60s default leeway).
    claims.exp = now - 300;
    claims.iat = Some(now - 3600);

    let result = SecretVerifier::new(TEST_SECRET).verify_sync(&sign(&claims, TEST_SECRET));

    match result {
        Err(AuthError::Invalid(e)) => assert!(matches!(
            e.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        )),
        other => panic!("Expected an expired-signature error, got {other:?}"),
    }
}

#[test]
fn test_wrong_secret_is_rejected() {
    let claims = session_claims(&Uuid::new_v4().to_string(), "wallet", "Carol");
    let token = sign(&claims, "some-other-secret-that-is-also-long-enough-xxxxxx");

    let result = SecretVerifier::new(TEST_SECRET).verify_sync(&token);
    assert!(matches!(result, Err(AuthError::Invalid(_))));
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = SecretVerifier::new(TEST_SECRET).verify_sync("not.a.jwt");
    assert!(result.is_err(), "Garbage token should be rejected");
}

#[test]
fn test_non_uuid_subject_is_reported() {
    let claims = session_claims("not-a-uuid", "wallet", "Dave");
    let claims = SecretVerifier::new(TEST_SECRET)
        .verify_sync(&sign(&claims, TEST_SECRET))
        .expect("Signature is fine");

    assert!(matches!(claims.user_id(), Err(AuthError::Subject(_))));
}

#[test]
fn test_blank_display_hints_are_ignored() {
    let mut claims = session_claims(&Uuid::new_v4().to_string(), "wallet", "   ");
    claims.picture = Some(String::new());

    assert!(claims.display_name().is_none());
    assert!(claims.avatar_url().is_none());
}
