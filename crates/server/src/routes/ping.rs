use axum::{http::StatusCode, Json};
use shared::api::error::{Nothing, ServerError};

use crate::db::DatabaseConnection;

/// Liveness check that also proves a database connection can be used
pub async fn ping(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<(StatusCode, Json<()>), ServerError<Nothing>> {
    conn.interact(|conn| conn.query_row("SELECT 1", (), |_| Ok(()))).await??;
    Ok((StatusCode::OK, Json(())))
}
