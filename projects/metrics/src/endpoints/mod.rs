pub mod github;
pub mod home;

use axum::{routing::get, Extension, Router};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(home::index::handler))
		.route("/github/metrics", get(github::metrics::read::index::handler))
		.route(
			"/api/github-metrics-sync",
			get(github::metrics::sync::index::handler),
		)
		.layer(Extension(state))
}
