use async_trait::async_trait;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::PgConnection;
use thiserror::Error;
use tracing::debug;

use crate::db::{
    build_pool,
    metrics::{
        models::MetricsRecord,
        queries::{read_metrics, upsert_metrics, ReadMetricsError, UpsertMetricsError},
    },
    PgPool,
};

#[derive(Debug, Error)]
pub enum MetricsStoreError {
    #[error("DATABASE_URL environment variable is not set")]
    MissingDatabaseUrl,

    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },

    #[error(transparent)]
    ReadMetrics {
        #[from]
        source: ReadMetricsError,
    },

    #[error(transparent)]
    UpsertMetrics {
        #[from]
        source: UpsertMetricsError,
    },

    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Read and overwrite the single metrics row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// `None` when the row has never been written.
    async fn read_metrics(&self) -> Result<Option<MetricsRecord>, MetricsStoreError>;

    async fn write_metrics(
        &self,
        commits: i64,
        repos: i64,
    ) -> Result<MetricsRecord, MetricsStoreError>;
}

/// Postgres-backed store. Diesel is synchronous, so every query runs on the
/// blocking pool.
#[derive(Clone)]
pub struct PgMetricsStore {
    pool: Option<PgPool>,
}

impl PgMetricsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// A missing URL is not an error yet; it surfaces on the first read or write.
    pub fn from_database_url(database_url: Option<&str>) -> Self {
        Self {
            pool: database_url.map(build_pool),
        }
    }

    fn connection(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<PgConnection>>, MetricsStoreError> {
        let pool = self.pool.as_ref().ok_or(MetricsStoreError::MissingDatabaseUrl)?;
        pool.get()
            .map_err(|source| MetricsStoreError::GetConnectionFromPool { source })
    }
}

#[async_trait]
impl MetricsStore for PgMetricsStore {
    async fn read_metrics(&self) -> Result<Option<MetricsRecord>, MetricsStoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = store.connection()?;
            Ok::<_, MetricsStoreError>(read_metrics(&mut conn)?)
        })
        .await?
    }

    async fn write_metrics(
        &self,
        commits: i64,
        repos: i64,
    ) -> Result<MetricsRecord, MetricsStoreError> {
        let store = self.clone();
        let record = tokio::task::spawn_blocking(move || {
            let mut conn = store.connection()?;
            Ok::<_, MetricsStoreError>(upsert_metrics(&mut conn, commits, repos)?)
        })
        .await??;

        debug!(commits = record.commits, repos = record.repos, "metrics row written");
        Ok(record)
    }
}
