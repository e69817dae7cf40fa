use diesel::prelude::*;
use diesel::upsert::excluded;
use thiserror::Error;

use crate::db::{metrics::models::*, schema::github_metrics::dsl::*};

#[derive(Debug, Error)]
pub enum ReadMetricsError {
    #[error("ReadMetrics: {source}")]
    ReadMetrics {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn read_metrics(conn: &mut PgConnection) -> Result<Option<MetricsRecord>, ReadMetricsError> {
    github_metrics
        .find(METRICS_ROW_ID)
        .select(MetricsRecord::as_select())
        .first(conn)
        .optional()
        .map_err(|source| ReadMetricsError::ReadMetrics { source })
}

#[derive(Debug, Error)]
pub enum UpsertMetricsError {
    #[error("UpsertMetrics: {source}")]
    UpsertMetrics {
        #[from]
        source: diesel::result::Error,
    },
}

/// Overwrites the single row, creating it if the seed is missing.
pub fn upsert_metrics(
    conn: &mut PgConnection,
    commits_val: i64,
    repos_val: i64,
) -> Result<MetricsRecord, UpsertMetricsError> {
    let new = NewMetricsRecord {
        id: METRICS_ROW_ID,
        commits: commits_val,
        repos: repos_val,
    };

    diesel::insert_into(github_metrics)
        .values(&new)
        .on_conflict(id)
        .do_update()
        .set((commits.eq(excluded(commits)), repos.eq(excluded(repos))))
        .returning(MetricsRecord::as_returning())
        .get_result(conn)
        .map_err(|source| UpsertMetricsError::UpsertMetrics { source })
}
