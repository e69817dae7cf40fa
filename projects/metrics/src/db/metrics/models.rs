use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::github_metrics;

/// The single row is always keyed by this id.
pub const METRICS_ROW_ID: i32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = github_metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MetricsRecord {
    pub id: i32,
    pub commits: i64,
    pub repos: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = github_metrics)]
pub struct NewMetricsRecord {
    pub id: i32,
    pub commits: i64,
    pub repos: i64,
}
