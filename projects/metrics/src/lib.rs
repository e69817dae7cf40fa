//! GitHub commit metrics service
//!
//! - Sync job in `sync/`, triggered by `GET /api/github-metrics-sync`
//! - PostgreSQL model and queries in `db/`
//! - REST and HTML endpoints in `endpoints/`
//! - Configured from the environment, see `config`

pub mod config;
pub mod db;
pub mod endpoints;
pub mod state;
pub mod sync;
pub mod throttle;
