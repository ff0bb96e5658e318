use sqlx::{Connection, PgConnection};

use crate::error::AppResult;

/// Open the single connection the runner works over.
pub async fn connect(database_url: &str) -> AppResult<PgConnection> {
    let conn = PgConnection::connect(database_url).await?;
    tracing::info!("database connection established");
    Ok(conn)
}

/// Gracefully close the connection, sending the terminate message to the server.
pub async fn close(conn: PgConnection) -> AppResult<()> {
    conn.close().await?;
    tracing::debug!("database connection closed");
    Ok(())
}
