use axum::{
	extract::Extension,
	http::StatusCode,
	response::{Html, IntoResponse, Response},
};
use tracing::error;

use crate::db::metrics::models::MetricsRecord;
use crate::state::AppState;

const NO_DATA: &str = "No GitHub metrics available.";

pub fn render(record: Option<&MetricsRecord>) -> String {
	let content = match record {
		Some(record) => format!(
			"<ul>\n<li><strong>{}</strong> total commits!</li>\n<li><strong>{}</strong> total repos!</li>\n</ul>",
			record.commits, record.repos
		),
		None => format!("<p>{NO_DATA}</p>"),
	};

	format!(
		"<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>GitHub metrics</title></head>\n<body>\n{content}\n</body>\n</html>\n"
	)
}

/// Axum handler: GET /
pub async fn handler(Extension(state): Extension<AppState>) -> Response {
	match state.store.read_metrics().await {
		Ok(record) => Html(render(record.as_ref())).into_response(),
		Err(source) => {
			error!(error = %source, "failed to fetch GitHub metrics from the database");
			(
				StatusCode::INTERNAL_SERVER_ERROR,
				"Failed to fetch GitHub metrics from the database",
			)
				.into_response()
		}
	}
}
