pub mod gigs;
pub mod users;

use sea_orm::{Database, DatabaseConnection, DbErr};
use tokio::sync::OnceCell;

static CONNECTION: OnceCell<DatabaseConnection> = OnceCell::const_new();

/// Process-wide SeaORM connection pool, opened on first use and never torn down.
///
/// Concurrent first callers share a single connect attempt; a failed attempt
/// leaves the cell empty so the next caller retries.
pub async fn connection(database_url: &str) -> Result<&'static DatabaseConnection, DbErr> {
    CONNECTION
        .get_or_try_init(|| async {
            tracing::info!("Opening database connection pool");
            Database::connect(database_url).await
        })
        .await
}
