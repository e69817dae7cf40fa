use interfaces_github_contributions::Contributor;
use serde::Serialize;

/// Result of looking up one repository's contributors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Counted { repository: String, contributions: u64 },
    Failed { repository: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoFailure {
    pub repository: String,
    pub reason: String,
}

/// Contributions attributed to `login`, 0 when it is not in the list.
pub fn contributions_of(login: &str, contributors: &[Contributor]) -> u64 {
    contributors
        .iter()
        .find(|contributor| contributor.login.as_deref() == Some(login))
        .map_or(0, |contributor| contributor.contributions)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncTally {
    pub total_commits: u64,
    /// Repositories whose contributor list was fetched.
    pub processed: usize,
    pub failures: Vec<RepoFailure>,
}

impl SyncTally {
    pub fn record(mut self, outcome: RepoOutcome) -> Self {
        match outcome {
            RepoOutcome::Counted { contributions, .. } => {
                self.total_commits = self.total_commits.saturating_add(contributions);
                self.processed += 1;
            }
            RepoOutcome::Failed { repository, reason } => {
                self.failures.push(RepoFailure { repository, reason });
            }
        }
        self
    }
}

impl FromIterator<RepoOutcome> for SyncTally {
    fn from_iter<I: IntoIterator<Item = RepoOutcome>>(outcomes: I) -> Self {
        outcomes.into_iter().fold(Self::default(), Self::record)
    }
}
