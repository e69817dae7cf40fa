use std::sync::Arc;

use interfaces_github_contributions::{FetchGitHubError, GitHubClient};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::store::{MetricsStore, PgMetricsStore};
use crate::sync::HostingApi;
use crate::throttle::{FixedInterval, Throttle};

/// Shared by every handler through an `Extension` layer.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn HostingApi>,
    pub store: Arc<dyn MetricsStore>,
    pub throttle: Arc<dyn Throttle>,
    pub cron_secret: Arc<str>,
    pub page_size: u32,
    /// Held for the duration of a sync so overlapping triggers are refused.
    pub sync_guard: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn HostingApi>,
        store: Arc<dyn MetricsStore>,
        throttle: Arc<dyn Throttle>,
        cron_secret: &str,
        page_size: u32,
    ) -> Self {
        Self {
            api,
            store,
            throttle,
            cron_secret: Arc::from(cron_secret),
            page_size,
            sync_guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchGitHubError> {
        let api = GitHubClient::new(config.github_token.as_str(), &config.github_api_url)?;
        let store = PgMetricsStore::from_database_url(config.database_url.as_deref());

        Ok(Self::new(
            Arc::new(api),
            Arc::new(store),
            Arc::new(FixedInterval::new(config.request_delay)),
            &config.cron_secret,
            config.page_size,
        ))
    }
}
