use axum::{
	extract::{Extension, Json},
	http::{header::AUTHORIZATION, HeaderMap, StatusCode},
	response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::state::AppState;
use crate::sync::{run_sync, SyncError, SyncReport};

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("Unauthorized")]
	Unauthorized,

	#[error("GitHub metrics sync already in progress")]
	SyncInProgress,

	#[error("Sync: {source}")]
	Sync {
		#[from]
		source: SyncError,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> axum::response::Response {
		let (status, message) = match &self {
			HandlerError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
			HandlerError::SyncInProgress => (StatusCode::CONFLICT, self.to_string()),
			// Upstream details stay in the logs.
			HandlerError::Sync { .. } => (
				StatusCode::INTERNAL_SERVER_ERROR,
				"GitHub Metrics Sync Failed".to_string(),
			),
		};

		(status, Json(json!({ "error": message }))).into_response()
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
	pub success: bool,
	pub username: String,
	pub total_commits: u64,
	pub total_repos: usize,
	pub processed_repos: usize,
	pub timestamp: DateTime<Utc>,
}

impl From<SyncReport> for SyncResponse {
	fn from(report: SyncReport) -> Self {
		Self {
			success: true,
			username: report.username,
			total_commits: report.total_commits,
			total_repos: report.total_repos,
			processed_repos: report.processed_repos,
			timestamp: report.timestamp,
		}
	}
}

/// `Authorization` must be exactly `Bearer <secret>`.
pub fn is_authorized(headers: &HeaderMap, secret: &str) -> bool {
	headers
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.strip_prefix("Bearer "))
		.is_some_and(|token| token == secret)
}

/// Axum handler: GET /api/github-metrics-sync
pub async fn handler(
	Extension(state): Extension<AppState>,
	headers: HeaderMap,
) -> Result<Json<SyncResponse>, HandlerError> {
	if !is_authorized(&headers, &state.cron_secret) {
		warn!("rejected sync trigger with missing or invalid secret");
		return Err(HandlerError::Unauthorized);
	}

	let _running = state
		.sync_guard
		.try_lock()
		.map_err(|_| HandlerError::SyncInProgress)?;

	let report = run_sync(
		state.api.as_ref(),
		state.store.as_ref(),
		state.throttle.as_ref(),
		state.page_size,
	)
	.await
	.map_err(|source| {
		error!(error = %source, "GitHub metrics sync failed");
		HandlerError::Sync { source }
	})?;

	for failure in &report.failures {
		info!(repository = %failure.repository, reason = %failure.reason, "repository skipped");
	}
	info!(
		username = %report.username,
		total_commits = report.total_commits,
		total_repos = report.total_repos,
		"GitHub metrics sync finished"
	);

	Ok(Json(SyncResponse::from(report)))
}
