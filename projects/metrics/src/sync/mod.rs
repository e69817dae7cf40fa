//! Full re-scan of the authenticated account's repositories.
//!
//! Requests are issued one at a time with the throttle in between. A failure
//! on one repository's contributor list is recorded and skipped; any other
//! failure aborts before the store is touched.

pub mod hosting;
pub mod outcome;

use chrono::{DateTime, Utc};
use interfaces_github_contributions::{FetchGitHubError, Repository};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{
    metrics::models::MetricsRecord,
    store::{MetricsStore, MetricsStoreError},
};
use crate::throttle::Throttle;

pub use hosting::HostingApi;
pub use outcome::{contributions_of, RepoFailure, RepoOutcome, SyncTally};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("FetchAuthenticatedUser: {source}")]
    FetchAuthenticatedUser { source: FetchGitHubError },

    #[error("FetchOwnedRepositories page {page}: {source}")]
    FetchOwnedRepositories { page: u32, source: FetchGitHubError },

    #[error("CountOverflow: {field} = {value}")]
    CountOverflow { field: &'static str, value: u64 },

    #[error("WriteMetrics: {source}")]
    WriteMetrics { source: MetricsStoreError },
}

#[derive(Debug, Clone)]
pub struct SyncReport {
    pub username: String,
    pub total_commits: u64,
    pub total_repos: usize,
    pub processed_repos: usize,
    pub failures: Vec<RepoFailure>,
    pub record: MetricsRecord,
    pub timestamp: DateTime<Utc>,
}

/// Every repository owned by the authenticated account, page by page until a
/// page comes back short.
pub async fn fetch_all_owned_repositories(
    api: &dyn HostingApi,
    throttle: &dyn Throttle,
    page_size: u32,
) -> Result<Vec<Repository>, SyncError> {
    let mut repositories = Vec::new();
    let mut page = 1;

    loop {
        let batch = api
            .list_owned_repositories(page_size, page)
            .await
            .map_err(|source| SyncError::FetchOwnedRepositories { page, source })?;

        let fetched = batch.len();
        info!(page, fetched, "fetched repository page");
        repositories.extend(batch);

        if fetched < page_size as usize {
            break;
        }

        page += 1;
        throttle.pause().await;
    }

    info!(total = repositories.len(), pages = page, "found repositories");
    Ok(repositories)
}

/// Looks up `login`'s contributions on each repository in turn.
pub async fn count_contributions(
    api: &dyn HostingApi,
    throttle: &dyn Throttle,
    login: &str,
    repositories: &[Repository],
) -> SyncTally {
    let mut tally = SyncTally::default();

    for repository in repositories {
        throttle.pause().await;

        let full_name = repository.full_name();
        debug!(repository = %full_name, "processing repository");

        let outcome = match api
            .list_contributors(&repository.owner.login, &repository.name)
            .await
        {
            Ok(contributors) => {
                let contributions = contributions_of(login, &contributors);
                if contributions > 0 {
                    debug!(repository = %full_name, contributions, "added commits");
                }
                RepoOutcome::Counted {
                    repository: full_name,
                    contributions,
                }
            }
            Err(err) => {
                warn!(repository = %full_name, error = %err, "failed to fetch contributors, skipping");
                RepoOutcome::Failed {
                    repository: full_name,
                    reason: err.to_string(),
                }
            }
        };

        tally = tally.record(outcome);
    }

    tally
}

/// Recomputes the totals from scratch and overwrites the stored record.
pub async fn run_sync(
    api: &dyn HostingApi,
    store: &dyn MetricsStore,
    throttle: &dyn Throttle,
    page_size: u32,
) -> Result<SyncReport, SyncError> {
    let username = api
        .authenticated_login()
        .await
        .map_err(|source| SyncError::FetchAuthenticatedUser { source })?;
    info!(%username, "fetching commits for user");

    let repositories = fetch_all_owned_repositories(api, throttle, page_size).await?;
    let total_repos = repositories.len();

    let tally = count_contributions(api, throttle, &username, &repositories).await;
    info!(
        processed = tally.processed,
        failed = tally.failures.len(),
        total = total_repos,
        total_commits = tally.total_commits,
        "processed repositories"
    );

    let commits = to_column("commits", tally.total_commits)?;
    let repos = to_column("repos", total_repos as u64)?;

    info!("updating database with new metrics");
    let record = store
        .write_metrics(commits, repos)
        .await
        .map_err(|source| SyncError::WriteMetrics { source })?;

    Ok(SyncReport {
        username,
        total_commits: tally.total_commits,
        total_repos,
        processed_repos: tally.processed,
        failures: tally.failures,
        record,
        timestamp: Utc::now(),
    })
}

fn to_column(field: &'static str, value: u64) -> Result<i64, SyncError> {
    i64::try_from(value).map_err(|_| SyncError::CountOverflow { field, value })
}

#[cfg(test)]
mod tests;
