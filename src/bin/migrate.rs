use storefront_report::{config::AppConfig, db, schema};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    let mut conn = db::connect(&config.database_url).await?;
    let result = schema::ensure_schema(&mut conn).await;
    db::close(conn).await?;
    result?;
    println!("Schema ready");
    Ok(())
}
