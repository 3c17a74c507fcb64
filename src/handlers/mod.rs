pub mod gigs;
pub mod upload;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Gig routes (all protected by the AuthenticatedUser extractor) ──
    cfg.service(
        web::resource("/gigs")
            .route(web::get().to(gigs::get_gigs))
            .route(web::post().to(gigs::create_gig))
            .default_service(web::to(method_not_allowed)),
    );
    cfg.service(
        web::resource("/gigs/{id}")
            .route(web::get().to(gigs::get_gig))
            .default_service(web::to(method_not_allowed)),
    );

    // ── Image uploads (protected) ──
    cfg.service(
        web::resource("/upload")
            .route(web::post().to(upload::upload_image))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Fallback for any method a resource does not route.
pub async fn method_not_allowed() -> actix_web::HttpResponse {
    actix_web::HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "message": "Method not allowed",
    }))
}
