//! Process configuration, read once from the environment at startup.

use std::{env, net::SocketAddr, time::Duration};

use interfaces_github_contributions::DEFAULT_API_BASE_URL;
use thiserror::Error;
use tracing::info;
use utils_trace::LogFormat;

pub const MAX_PAGE_SIZE: u32 = 100;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_REQUEST_DELAY_MS: u64 = 100;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {key}")]
    MissingVar { key: &'static str },

    #[error("Invalid value for {key}: {message}")]
    InvalidVar { key: &'static str, message: String },
}

#[derive(Clone)]
pub struct Config {
    pub github_token: String,
    pub cron_secret: String,
    /// Checked lazily by the store so a missing value only fails on first use.
    pub database_url: Option<String>,
    pub github_api_url: String,
    pub bind_addr: SocketAddr,
    pub page_size: u32,
    pub request_delay: Duration,
    pub log_level: String,
    pub log_format: LogFormat,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("github_api_url", &self.github_api_url)
            .field("bind_addr", &self.bind_addr)
            .field("page_size", &self.page_size)
            .field("request_delay", &self.request_delay)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let required = |key: &'static str| var(key).ok_or(ConfigError::MissingVar { key });

        let github_token = required("GITHUB_TOKEN")?;
        let cron_secret = required("CRON_SECRET")?;
        let database_url = var("DATABASE_URL");

        let github_api_url = var("GITHUB_API_URL").unwrap_or_else(|| {
            info!("GITHUB_API_URL not set, using default: {DEFAULT_API_BASE_URL}");
            DEFAULT_API_BASE_URL.to_string()
        });

        let bind_addr = parse_or(var("BIND_ADDR"), "BIND_ADDR", DEFAULT_BIND_ADDR)?;

        let page_size: u32 = parse_or(var("SYNC_PAGE_SIZE"), "SYNC_PAGE_SIZE", "100")?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidVar {
                key: "SYNC_PAGE_SIZE",
                message: format!("must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"),
            });
        }

        let delay_ms: u64 = parse_or(
            var("SYNC_REQUEST_DELAY_MS"),
            "SYNC_REQUEST_DELAY_MS",
            &DEFAULT_REQUEST_DELAY_MS.to_string(),
        )?;

        let log_level = var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let log_format = parse_or(var("LOG_FORMAT"), "LOG_FORMAT", "compact")?;

        Ok(Self {
            github_token,
            cron_secret,
            database_url,
            github_api_url,
            bind_addr,
            page_size,
            request_delay: Duration::from_millis(delay_ms),
            log_level,
            log_format,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .as_deref()
        .unwrap_or(default)
        .trim()
        .parse()
        .map_err(|err: T::Err| ConfigError::InvalidVar {
            key,
            message: err.to_string(),
        })
}
