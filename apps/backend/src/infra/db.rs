use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbProfile};
use crate::error::AppError;

/// Connect without running migrations.
pub async fn connect_db(profile: &DbProfile) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile)?;
    let mut opts = ConnectOptions::new(database_url);
    opts.acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    if profile.is_in_memory() {
        // Every pooled connection would otherwise see its own empty database.
        opts.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(opts).await?;
    Ok(conn)
}

/// Single entrypoint used by the state builder: connect, then migrate up.
pub async fn bootstrap_db(profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(&profile).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    info!(?profile, "database ready");
    Ok(conn)
}
