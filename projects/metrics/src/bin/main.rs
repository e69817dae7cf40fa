use axum::serve;
use projects_metrics::{config::Config, endpoints::router, state::AppState};
use thiserror::Error;
use tracing::{info, warn};
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("Config: {source}")]
	Config {
		#[source]
		source: projects_metrics::config::ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("BuildGitHubClient: {source}")]
	BuildGitHubClient {
		#[source]
		source: interfaces_github_contributions::FetchGitHubError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	},
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	// A missing .env file is fine; the variables may come from the environment.
	let dotenv = dotenvy::dotenv();

	let config = Config::from_env().map_err(|source| MainError::Config { source })?;

	tracing_init(&config.log_level, config.log_format)
		.map_err(|source| MainError::TracingInit { source })?;

	if let Err(err) = dotenv {
		info!("no .env file loaded: {err}");
	}
	if config.database_url.is_none() {
		warn!("DATABASE_URL is not set; metrics reads and writes will fail");
	}
	info!(?config, "configuration loaded");

	let state =
		AppState::from_config(&config).map_err(|source| MainError::BuildGitHubClient { source })?;

	let app = router(state);

	let listener = tokio::net::TcpListener::bind(config.bind_addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", config.bind_addr);

	serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
