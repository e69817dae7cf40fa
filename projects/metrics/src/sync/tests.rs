use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use interfaces_github_contributions::{Contributor, FetchGitHubError, Repository};
use reqwest::StatusCode;
use rstest::rstest;

use super::hosting::MockHostingApi;
use super::*;
use crate::db::store::MockMetricsStore;
use crate::throttle::NoDelay;

const PAGE_SIZE: u32 = 100;

#[derive(Default)]
struct CountingThrottle {
    pauses: AtomicUsize,
}

impl CountingThrottle {
    fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Throttle for CountingThrottle {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

fn owned_repos(count: usize) -> Vec<Repository> {
    (0..count)
        .map(|index| Repository::new("me", format!("repo-{index}")))
        .collect()
}

fn forbidden(path: &str) -> FetchGitHubError {
    FetchGitHubError::UnexpectedStatus {
        path: path.to_string(),
        status: StatusCode::FORBIDDEN,
        body: "Repository access blocked".to_string(),
    }
}

/// Serves `repositories` in pages of `per_page`, expecting exactly
/// `expected_pages` listing calls.
fn api_serving(repositories: Vec<Repository>, expected_pages: usize) -> MockHostingApi {
    let mut api = MockHostingApi::new();
    api.expect_authenticated_login()
        .times(1)
        .returning(|| Ok("me".to_string()));
    api.expect_list_owned_repositories()
        .times(expected_pages)
        .returning(move |per_page, page| {
            let start = ((page - 1) * per_page) as usize;
            Ok(repositories
                .iter()
                .skip(start)
                .take(per_page as usize)
                .cloned()
                .collect())
        });
    api
}

fn store_expecting(commits: i64, repos: i64, times: usize) -> MockMetricsStore {
    let mut store = MockMetricsStore::new();
    store
        .expect_write_metrics()
        .withf(move |got_commits, got_repos| *got_commits == commits && *got_repos == repos)
        .times(times)
        .returning(|commits, repos| {
            Ok(MetricsRecord {
                id: 1,
                commits,
                repos,
            })
        });
    store
}

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(99, 1)]
#[case(100, 2)]
#[case(250, 3)]
#[tokio::test]
async fn issues_one_listing_call_per_page_and_one_lookup_per_repo(
    #[case] repo_count: usize,
    #[case] expected_pages: usize,
) {
    let mut api = api_serving(owned_repos(repo_count), expected_pages);
    api.expect_list_contributors()
        .times(repo_count)
        .returning(|_, _| Ok(vec![Contributor::new("me", 1)]));
    let store = store_expecting(repo_count as i64, repo_count as i64, 1);
    let throttle = CountingThrottle::default();

    let report = run_sync(&api, &store, &throttle, PAGE_SIZE)
        .await
        .expect("sync should succeed");

    assert_eq!(report.total_repos, repo_count);
    assert_eq!(report.total_commits, repo_count as u64);
    assert_eq!(report.processed_repos, repo_count);
    // One pause between pages, one before every contributor lookup.
    assert_eq!(throttle.pauses(), (expected_pages - 1) + repo_count);
}

#[tokio::test]
async fn only_the_authenticated_login_is_counted() {
    let repositories = vec![Repository::new("me", "a"), Repository::new("me", "b")];
    let mut api = api_serving(repositories, 1);
    api.expect_list_contributors()
        .times(2)
        .returning(|_, name| match name {
            "a" => Ok(vec![Contributor::new("me", 5)]),
            _ => Ok(vec![Contributor::new("other", 9)]),
        });
    let store = store_expecting(5, 2, 1);

    let report = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect("sync should succeed");

    assert_eq!(report.username, "me");
    assert_eq!(
        report.record,
        MetricsRecord {
            id: 1,
            commits: 5,
            repos: 2
        }
    );
}

#[tokio::test]
async fn one_failing_repository_is_skipped_but_still_counted() {
    let repositories = vec![
        Repository::new("me", "a"),
        Repository::new("me", "locked"),
        Repository::new("me", "c"),
    ];
    let mut api = api_serving(repositories, 1);
    api.expect_list_contributors()
        .times(3)
        .returning(|owner, name| match name {
            "locked" => Err(forbidden(&format!("/repos/{owner}/{name}/contributors"))),
            "a" => Ok(vec![Contributor::new("me", 4)]),
            _ => Ok(vec![Contributor::new("me", 6), Contributor::new("other", 1)]),
        });
    let store = store_expecting(10, 3, 1);

    let report = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect("a single repository failure must not abort the sync");

    assert_eq!(report.total_commits, 10);
    assert_eq!(report.total_repos, 3);
    assert_eq!(report.processed_repos, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].repository, "me/locked");
    assert!(report.failures[0].reason.contains("403"));
}

#[rstest]
#[case(false)]
#[case(true)]
#[tokio::test]
async fn totals_do_not_depend_on_repository_order(#[case] reversed: bool) {
    let mut repositories = vec![
        Repository::new("me", "a"),
        Repository::new("me", "b"),
        Repository::new("me", "c"),
    ];
    if reversed {
        repositories.reverse();
    }
    let mut api = api_serving(repositories, 1);
    api.expect_list_contributors()
        .times(3)
        .returning(|_, name| {
            let count = match name {
                "a" => 3,
                "b" => 11,
                _ => 4,
            };
            Ok(vec![Contributor::new("me", count)])
        });
    let store = store_expecting(18, 3, 1);

    let report = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect("sync should succeed");

    assert_eq!(report.total_commits, 18);
}

#[tokio::test]
async fn rerunning_with_the_same_upstream_data_writes_the_same_record() {
    let mut api = MockHostingApi::new();
    api.expect_authenticated_login()
        .times(2)
        .returning(|| Ok("me".to_string()));
    api.expect_list_owned_repositories()
        .times(2)
        .returning(|_, _| Ok(vec![Repository::new("me", "a"), Repository::new("me", "b")]));
    api.expect_list_contributors()
        .times(4)
        .returning(|_, _| Ok(vec![Contributor::new("me", 7)]));
    let store = store_expecting(14, 2, 2);

    let first = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect("first run");
    let second = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect("second run");

    assert_eq!(first.record, second.record);
}

#[tokio::test]
async fn identity_failure_aborts_before_listing_or_writing() {
    let mut api = MockHostingApi::new();
    api.expect_authenticated_login()
        .times(1)
        .returning(|| Err(forbidden("/user")));
    api.expect_list_owned_repositories().times(0);
    api.expect_list_contributors().times(0);
    let mut store = MockMetricsStore::new();
    store.expect_write_metrics().times(0);

    let err = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect_err("identity failure is fatal");

    assert!(matches!(err, SyncError::FetchAuthenticatedUser { .. }));
}

#[tokio::test]
async fn page_failure_aborts_without_persisting() {
    let mut api = MockHostingApi::new();
    api.expect_authenticated_login()
        .returning(|| Ok("me".to_string()));
    api.expect_list_owned_repositories()
        .times(2)
        .returning(|per_page, page| match page {
            1 => Ok(owned_repos(per_page as usize)),
            _ => Err(forbidden("/user/repos")),
        });
    api.expect_list_contributors().times(0);
    let mut store = MockMetricsStore::new();
    store.expect_write_metrics().times(0);

    let err = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect_err("pagination failure is fatal");

    assert!(matches!(
        err,
        SyncError::FetchOwnedRepositories { page: 2, .. }
    ));
}

#[tokio::test]
async fn store_failure_is_reported() {
    let mut api = api_serving(vec![Repository::new("me", "a")], 1);
    api.expect_list_contributors()
        .returning(|_, _| Ok(vec![Contributor::new("me", 1)]));
    let mut store = MockMetricsStore::new();
    store
        .expect_write_metrics()
        .times(1)
        .returning(|_, _| Err(MetricsStoreError::MissingDatabaseUrl));

    let err = run_sync(&api, &store, &NoDelay, PAGE_SIZE)
        .await
        .expect_err("write failure is fatal");

    assert!(matches!(
        err,
        SyncError::WriteMetrics {
            source: MetricsStoreError::MissingDatabaseUrl
        }
    ));
}

#[tokio::test]
async fn smaller_page_size_is_honoured() {
    let mut api = api_serving(owned_repos(5), 3);
    api.expect_list_contributors()
        .times(5)
        .returning(|_, _| Ok(Vec::new()));
    let store = store_expecting(0, 5, 1);

    let report = run_sync(&api, &store, &NoDelay, 2)
        .await
        .expect("sync should succeed");

    assert_eq!(report.total_repos, 5);
    assert_eq!(report.total_commits, 0);
}
