//! Database connection and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Handlers open one connection per invocation through [`connect`] and close
//! it before returning. No pool: invocations share nothing but the
//! connection string. Startup uses [`migrate`] to apply the embedded schema
//! before accepting traffic.

use sqlx::migrate::MigrateError;
use sqlx::{Connection, PgConnection};

/// Open a single `PostgreSQL` connection.
///
/// # Errors
///
/// Returns an error if the URL is malformed or the server is unreachable.
pub async fn connect(database_url: &str) -> Result<PgConnection, sqlx::Error> {
    PgConnection::connect(database_url).await
}

/// Apply the embedded migrations on a dedicated connection.
///
/// # Errors
///
/// Returns an error if the connection or any migration fails.
pub async fn migrate(database_url: &str) -> Result<(), MigrateError> {
    let mut conn = connect(database_url).await?;
    let outcome = sqlx::migrate!("src/db/migrations").run(&mut conn).await;
    conn.close().await?;
    outcome
}
