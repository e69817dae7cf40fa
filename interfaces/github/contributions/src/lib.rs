//! Thin GitHub REST client for the endpoints the metrics sync needs:
//! the authenticated user, owned repositories and per-repository contributors.

pub mod index;
pub mod models;

pub use index::{FetchGitHubError, GitHubClient, DEFAULT_API_BASE_URL};
pub use models::{AuthenticatedUser, Contributor, Repository, RepositoryOwner};
