use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::gigs as gig_db;
use crate::models::PaginationQuery;
use crate::models::gigs::CreateGig;
use crate::models::listings::Listing;

/// GET /api/gigs: active listings, newest first (requires authentication).
/// Query params: ?page=1&limit=20
pub async fn get_gigs(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> impl Responder {
    match gig_db::get_active_gigs_with_owner(db.get_ref(), query.page(), query.limit()).await {
        Ok(rows) => {
            let listings: Vec<Listing> = rows
                .into_iter()
                .map(|(gig, owner)| Listing::from_row(gig, owner))
                .collect();
            HttpResponse::Ok().json(listings)
        }
        Err(e) => {
            tracing::error!("Error fetching gigs: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error fetching gigs",
            }))
        }
    }
}

/// GET /api/gigs/{id}: a single listing (requires authentication).
pub async fn get_gig(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let id = path.into_inner();
    match gig_db::get_gig_with_owner(db.get_ref(), id).await {
        Ok(Some((gig, owner))) => HttpResponse::Ok().json(Listing::from_row(gig, owner)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("Gig {id} not found"),
        })),
        Err(e) => {
            tracing::error!("Error fetching gig {id}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error fetching gig",
            }))
        }
    }
}

/// POST /api/gigs: create a gig owned by the caller (requires authentication).
pub async fn create_gig(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateGig>,
) -> impl Responder {
    let input = body.into_inner();
    if let Err(reason) = input.validate() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": reason,
        }));
    }

    let user_id = user.0.id;
    match gig_db::insert_gig(db.get_ref(), input, user_id).await {
        Ok(gig) => {
            tracing::info!(gig_id = %gig.id, %user_id, "Gig created");
            HttpResponse::Created().json(gig)
        }
        Err(e) => {
            tracing::error!("Error creating gig: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Error creating gig",
            }))
        }
    }
}
