use async_trait::async_trait;
use interfaces_github_contributions::{Contributor, FetchGitHubError, GitHubClient, Repository};

/// The three hosting-API calls the sync job makes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostingApi: Send + Sync {
    async fn authenticated_login(&self) -> Result<String, FetchGitHubError>;

    async fn list_owned_repositories(
        &self,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<Repository>, FetchGitHubError>;

    async fn list_contributors(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<Contributor>, FetchGitHubError>;
}

#[async_trait]
impl HostingApi for GitHubClient {
    async fn authenticated_login(&self) -> Result<String, FetchGitHubError> {
        Ok(self.fetch_authenticated_user().await?.login)
    }

    async fn list_owned_repositories(
        &self,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<Repository>, FetchGitHubError> {
        self.fetch_owned_repositories(per_page, page).await
    }

    async fn list_contributors(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<Contributor>, FetchGitHubError> {
        self.fetch_repo_contributors(owner, name).await
    }
}
