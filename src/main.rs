use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_report::{
    config::{AppConfig, ReportFormat},
    report::{JsonSink, TextSink},
    runner,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storefront_report=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = AppConfig::from_env()?;
    let stdout = io::stdout().lock();

    match config.format {
        ReportFormat::Text => runner::run(&config, &mut TextSink::new(stdout)).await?,
        ReportFormat::Json => runner::run(&config, &mut JsonSink::new(stdout)).await?,
    }

    Ok(())
}
