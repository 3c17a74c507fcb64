///! Integration tests for the gig routes.
///!
///! The app is built the same way `main` builds it, but on top of a SeaORM
///! `MockDatabase` and a shared-secret session verifier, so no Postgres or
///! session provider is needed.
///!
///! Run with: `cargo test --test gigs_api_test`
use actix_web::{App, http::StatusCode, test, web};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use std::sync::Arc;
use uuid::Uuid;

use soleer_marketplace::auth::{Claims, SecretVerifier, SharedVerifier};
use soleer_marketplace::handlers;
use soleer_marketplace::models::gigs::{self, GigStatus};
use soleer_marketplace::models::users;

const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";
const WALLET: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

fn token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        wallet: Some(WALLET.to_string()),
        name: Some("Freexyz".to_string()),
        picture: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to encode test JWT")
}

fn user_row(id: Uuid) -> users::Model {
    users::Model {
        id,
        wallet_address: Some(WALLET.to_string()),
        display_name: Some("Freexyz".to_string()),
        avatar_url: None,
        skills: serde_json::json!(["Rust", "Anchor"]),
        created_at: Utc::now(),
        updated_at: None,
    }
}

fn gig_row(user_id: Uuid, title: &str) -> gigs::Model {
    gigs::Model {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "Audits for Solana programs".to_string(),
        amount: 8.0,
        image: Some("/uploads/banner.png".to_string()),
        status: GigStatus::Active,
        user_id,
        created_at: Utc::now(),
    }
}

macro_rules! app {
    ($db:expr) => {{
        let verifier: SharedVerifier = Arc::new(SecretVerifier::new(TEST_SECRET));
        let db: DatabaseConnection = $db;
        test::init_service(
            App::new()
                .app_data(web::Data::new(db))
                .app_data(web::Data::new(verifier))
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    }};
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Smart Contract Dev",
        "description": "Audits for Solana programs",
        "amount": 8.0,
        "image": "/uploads/banner.png",
        "status": "ACTIVE",
    })
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = app!(empty_db());

    let req = test::TestRequest::post()
        .uri("/api/gigs")
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[actix_web::test]
async fn test_bad_token_is_unauthorized() {
    let app = app!(empty_db());

    let req = test::TestRequest::get()
        .uri("/api/gigs")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_unrouted_method_is_rejected() {
    let app = app!(empty_db());

    let req = test::TestRequest::put()
        .uri("/api/gigs")
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "message": "Method not allowed" }));
}

#[actix_web::test]
async fn test_create_gig_returns_created_row() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id)]])
        .append_query_results([vec![gig_row(user_id, "Smart Contract Dev")]])
        .into_connection();
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/gigs")
        .insert_header(("Authorization", format!("Bearer {}", token_for(user_id))))
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Smart Contract Dev");
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["user_id"], user_id.to_string());
}

#[actix_web::test]
async fn test_create_gig_rejects_invalid_body() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id)]])
        .into_connection();
    let app = app!(db);

    let mut body = valid_body();
    body["amount"] = serde_json::json!(0);

    let req = test::TestRequest::post()
        .uri("/api/gigs")
        .insert_header(("Authorization", format!("Bearer {}", token_for(user_id))))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_gig_storage_failure_is_reported() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id)]])
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();
    let app = app!(db);

    let req = test::TestRequest::post()
        .uri("/api/gigs")
        .insert_header(("Authorization", format!("Bearer {}", token_for(user_id))))
        .set_json(valid_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "error": "Error creating gig" }));
}

#[actix_web::test]
async fn test_list_gigs_returns_listings() {
    let user_id = Uuid::new_v4();
    let owner = user_row(user_id);
    let gig = gig_row(user_id, "Smart Contract Dev");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![owner.clone()]])
        .append_query_results([vec![(gig.clone(), owner)]])
        .into_connection();
    let app = app!(db);

    let req = test::TestRequest::get()
        .uri("/api/gigs?page=1&limit=15")
        .insert_header(("Authorization", format!("Bearer {}", token_for(user_id))))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        serde_json::json!([{
            "id": gig.id.to_string(),
            "title": "Smart Contract Dev",
            "description": "Audits for Solana programs",
            "price": 8.0,
            "image": "/uploads/banner.png",
            "freelancer": {
                "name": "Freexyz",
                "avatar": "/images/user.png",
                "skills": ["Rust", "Anchor"],
            },
        }])
    );
}

#[actix_web::test]
async fn test_list_gigs_huge_page_is_empty() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_row(user_id)]])
        .append_query_results([Vec::<gigs::Model>::new()])
        .into_connection();
    let app = app!(db);

    let req = test::TestRequest::get()
        .uri(&format!("/api/gigs?page={}&limit=20", u64::MAX))
        .insert_header(("Authorization", format!("Bearer {}", token_for(user_id))))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!([]));
}
