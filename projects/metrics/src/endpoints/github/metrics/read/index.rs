use axum::{
	extract::{Extension, Json},
	http::StatusCode,
	response::IntoResponse,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::{metrics::models::MetricsRecord, store::MetricsStoreError};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("No GitHub metrics available")]
	NoMetrics,

	#[error("ReadMetrics: {source}")]
	ReadMetrics {
		#[from]
		source: MetricsStoreError,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> axum::response::Response {
		match self {
			HandlerError::NoMetrics => (
				StatusCode::NOT_FOUND,
				Json(json!({ "error": "No GitHub metrics available" })),
			)
				.into_response(),
			HandlerError::ReadMetrics { source } => {
				error!(error = %source, "failed to fetch GitHub metrics from the database");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(json!({ "error": "Failed to fetch GitHub metrics from the database" })),
				)
					.into_response()
			}
		}
	}
}

/// Axum handler: GET /github/metrics
pub async fn handler(
	Extension(state): Extension<AppState>,
) -> Result<Json<MetricsRecord>, HandlerError> {
	let record = state
		.store
		.read_metrics()
		.await?
		.ok_or(HandlerError::NoMetrics)?;

	Ok(Json(record))
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use axum::body::to_bytes;
	use serde_json::Value;

	use super::*;
	use crate::db::store::MockMetricsStore;
	use crate::sync::hosting::MockHostingApi;
	use crate::throttle::NoDelay;

	async fn respond(store: MockMetricsStore) -> (StatusCode, Value) {
		let state = AppState::new(
			Arc::new(MockHostingApi::new()),
			Arc::new(store),
			Arc::new(NoDelay),
			"unused",
			100,
		);
		let response = handler(Extension(state)).await.into_response();
		let status = response.status();
		let bytes = to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("body should be readable");
		(status, serde_json::from_slice(&bytes).expect("body should be JSON"))
	}

	#[tokio::test]
	async fn returns_the_stored_record() {
		let mut store = MockMetricsStore::new();
		store.expect_read_metrics().times(1).returning(|| {
			Ok(Some(MetricsRecord {
				id: 1,
				commits: 1234,
				repos: 56,
			}))
		});

		let (status, body) = respond(store).await;

		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, json!({ "id": 1, "commits": 1234, "repos": 56 }));
	}

	#[tokio::test]
	async fn missing_row_is_no_data_not_zero() {
		let mut store = MockMetricsStore::new();
		store.expect_read_metrics().returning(|| Ok(None));

		let (status, body) = respond(store).await;

		assert_eq!(status, StatusCode::NOT_FOUND);
		assert_eq!(body["error"], "No GitHub metrics available");
	}

	#[tokio::test]
	async fn store_failure_is_a_server_error() {
		let mut store = MockMetricsStore::new();
		store
			.expect_read_metrics()
			.returning(|| Err(MetricsStoreError::MissingDatabaseUrl));

		let (status, _) = respond(store).await;

		assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	}
}
