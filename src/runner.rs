use sqlx::PgConnection;

use crate::{
    config::AppConfig,
    db,
    error::{AppError, AppResult},
    queries::ReportParams,
    report::{self, ReportSink},
    schema,
    seed::{self, SeedData},
};

/// Connect, ensure the schema, seed, report, and close the connection.
///
/// A failed seed is reported to `sink` and the reports still run. Any other
/// failure ends the run, after the connection has been closed.
pub async fn run<S: ReportSink>(config: &AppConfig, sink: &mut S) -> AppResult<()> {
    let mut conn = db::connect(&config.database_url).await?;

    let outcome = run_with(
        &mut conn,
        &SeedData::fixture(),
        &ReportParams::default(),
        sink,
    )
    .await;
    let closed = db::close(conn).await;

    outcome?;
    closed
}

/// Schema, seed and reports over an already open connection.
pub async fn run_with<S: ReportSink>(
    conn: &mut PgConnection,
    data: &SeedData,
    params: &ReportParams,
    sink: &mut S,
) -> AppResult<()> {
    schema::ensure_schema(conn).await?;

    match seed::upsert_all(conn, data).await {
        Ok(_) => {}
        Err(err @ AppError::SeedFailed { .. }) => sink.seed_failed(&err)?,
        Err(err) => return Err(err),
    }

    report::run_reports(conn, params, sink).await
}
