use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{AuthenticatedUser, Contributor, Repository};

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "github-metrics-sync";
const API_VERSION: &str = "2022-11-28";
const CONTRIBUTORS_PER_PAGE: &str = "100";

pub struct GitHubRestResult {
    pub body: String,
    pub status: StatusCode,
}

/// Authenticated REST client. Cheap to clone; the underlying connection pool
/// is shared.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, base_url: &str) -> Result<Self, FetchGitHubError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchGitHubError::BuildClient { source })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /user`
    pub async fn fetch_authenticated_user(&self) -> Result<AuthenticatedUser, FetchGitHubError> {
        let path = "/user";
        let result = self.get(path, &[]).await?;
        decode(result, path)
    }

    /// `GET /user/repos`, restricted to repositories the caller owns.
    pub async fn fetch_owned_repositories(
        &self,
        per_page: u32,
        page: u32,
    ) -> Result<Vec<Repository>, FetchGitHubError> {
        let path = "/user/repos";
        let per_page = per_page.to_string();
        let page = page.to_string();
        let query = [
            ("per_page", per_page.as_str()),
            ("page", page.as_str()),
            ("affiliation", "owner"),
        ];

        let result = self.get(path, &query).await?;
        decode(result, path)
    }

    /// `GET /repos/{owner}/{repo}/contributors`
    ///
    /// GitHub answers `204 No Content` for an empty repository; that is an
    /// empty list here.
    pub async fn fetch_repo_contributors(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<Contributor>, FetchGitHubError> {
        let path = format!("/repos/{owner}/{name}/contributors");
        let result = self
            .get(&path, &[("per_page", CONTRIBUTORS_PER_PAGE)])
            .await?;

        if result.status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        decode(result, &path)
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<GitHubRestResult, FetchGitHubError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchGitHubError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| FetchGitHubError::ResponseRead {
                path: path.to_string(),
                source,
            })?;

        debug!(path, %status, bytes = body.len(), "GitHub responded");

        Ok(GitHubRestResult { body, status })
    }
}

fn decode<T: DeserializeOwned>(
    result: GitHubRestResult,
    path: &str,
) -> Result<T, FetchGitHubError> {
    let GitHubRestResult { body, status } = result;

    if !status.is_success() {
        return Err(FetchGitHubError::UnexpectedStatus {
            path: path.to_string(),
            status,
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| FetchGitHubError::DeserializeResponseBody {
        path: path.to_string(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum FetchGitHubError {
    #[error("BuildClient: {source}")]
    BuildClient { source: reqwest::Error },

    #[error("RequestSend {path}: {source}")]
    RequestSend {
        path: String,
        source: reqwest::Error,
    },

    #[error("ResponseRead {path}: {source}")]
    ResponseRead {
        path: String,
        source: reqwest::Error,
    },

    #[error("UnexpectedStatus {path}: {status}")]
    UnexpectedStatus {
        path: String,
        status: StatusCode,
        body: String,
    },

    #[error("DeserializeResponseBody {path}: {source}")]
    DeserializeResponseBody {
        path: String,
        source: serde_json::Error,
    },
}
