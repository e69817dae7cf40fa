use serde::{Deserialize, Serialize};

/// `GET /user`, only the fields we read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthenticatedUser {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// One entry of `GET /user/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    pub owner: RepositoryOwner,
    pub name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: RepositoryOwner {
                login: owner.into(),
            },
            name: name.into(),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

/// One entry of `GET /repos/{owner}/{repo}/contributors`.
///
/// Anonymous contributors carry no login; they can never match the
/// authenticated user so the field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contributor {
    #[serde(default)]
    pub login: Option<String>,
    pub contributions: u64,
}

impl Contributor {
    pub fn new(login: impl Into<String>, contributions: u64) -> Self {
        Self {
            login: Some(login.into()),
            contributions,
        }
    }
}
