use std::env;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config(format!("unknown REPORT_FORMAT `{other}`"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub format: ReportFormat,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`, which returns `None` for unset keys.
    ///
    /// `DATABASE_URL` wins when present; otherwise the URL is assembled from
    /// `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and the required `DB_NAME`.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL").filter(|url| !url.is_empty()) {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = match lookup("DB_PORT") {
                    Some(port) => port
                        .parse::<u16>()
                        .map_err(|_| AppError::Config(format!("invalid DB_PORT `{port}`")))?,
                    None => 5432,
                };
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let name = lookup("DB_NAME").filter(|n| !n.is_empty()).ok_or_else(|| {
                    AppError::Config("set DATABASE_URL or DB_NAME".to_string())
                })?;
                match lookup("DB_PASSWORD").filter(|p| !p.is_empty()) {
                    Some(password) => format!("postgres://{user}:{password}@{host}:{port}/{name}"),
                    None => format!("postgres://{user}@{host}:{port}/{name}"),
                }
            }
        };

        let format = match lookup("REPORT_FORMAT") {
            Some(value) => ReportFormat::parse(&value)?,
            None => ReportFormat::Text,
        };

        Ok(Self {
            database_url,
            format,
        })
    }
}
