use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use soleer_marketplace::auth::jwks::JwksVerifier;
use soleer_marketplace::auth::{SecretVerifier, SharedVerifier};
use soleer_marketplace::config::{ServerConfig, SessionKeys};
use soleer_marketplace::handlers;
use soleer_marketplace::handlers::upload::UploadSettings;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;

    let db = soleer_marketplace::connection(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;

    if config.run_migrations {
        Migrator::up(db, None).await.map_err(std::io::Error::other)?;
        tracing::info!("Migrations applied");
    }
    let db_data = web::Data::new(db.clone());

    let verifier: SharedVerifier = match &config.session_keys {
        SessionKeys::Jwks(url) => {
            tracing::info!("Verifying sessions against {url}");
            Arc::new(JwksVerifier::new(url))
        }
        SessionKeys::Secret(secret) => Arc::new(SecretVerifier::new(secret)),
    };
    let verifier_data = web::Data::new(verifier);

    let upload_settings = web::Data::new(UploadSettings {
        dir: config.upload_dir.clone(),
        public_base: config.public_upload_base.clone(),
        max_bytes: config.max_upload_bytes,
    });
    std::fs::create_dir_all(&config.upload_dir)?;

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    let upload_dir = config.upload_dir.clone();
    // An absolute PUBLIC_UPLOAD_BASE points at external storage; serve locally under /uploads.
    let upload_mount = if config.public_upload_base.starts_with('/') {
        config.public_upload_base.clone()
    } else {
        "/uploads".to_string()
    };
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(verifier_data.clone())
            .app_data(upload_settings.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
            .service(Files::new(&upload_mount, upload_dir.clone()))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
