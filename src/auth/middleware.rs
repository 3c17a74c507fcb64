use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use sea_orm::DatabaseConnection;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::SharedVerifier;
use crate::db::users::find_or_create_from_session;
use crate::models::users::{self, CreateUserFromSession};

/// The caller's identity, resolved from the bearer session token.
///
/// Handlers take this as an explicit argument; nothing reads the session from
/// ambient request state.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub users::Model);

fn unauthorized(reason: impl Display) -> Error {
    tracing::debug!("Rejecting request: {reason}");
    InternalError::from_response(
        reason.to_string(),
        HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Unauthorized",
        })),
    )
    .into()
}

fn server_error(reason: impl Display) -> Error {
    tracing::error!("Session lookup failed: {reason}");
    InternalError::from_response(
        reason.to_string(),
        HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "Internal server error",
        })),
    )
    .into()
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Bearer token from the Authorization header.
            let bearer = BearerAuth::extract(&req)
                .await
                .map_err(|_| unauthorized("missing or malformed bearer token"))?;

            // 2. Verify it with whichever verifier the app was built with.
            let verifier = req
                .app_data::<web::Data<SharedVerifier>>()
                .ok_or_else(|| server_error("session verifier not configured"))?;

            let claims = verifier
                .verify(bearer.token())
                .await
                .map_err(|e| unauthorized(format!("invalid token: {e}")))?;

            let user_id = claims.user_id().map_err(unauthorized)?;

            // 3. Find or create the user row.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| server_error("database not configured"))?;

            let user = find_or_create_from_session(
                db.get_ref(),
                CreateUserFromSession {
                    id: user_id,
                    wallet_address: claims.wallet.clone(),
                    display_name: claims.display_name(),
                    avatar_url: claims.avatar_url(),
                },
            )
            .await
            .map_err(server_error)?;

            Ok(AuthenticatedUser(user))
        })
    }
}
