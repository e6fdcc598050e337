#![warn(clippy::pedantic)]

mod config;
mod database;
mod error;
mod extract;
mod openapi;
mod route;
#[cfg(test)]
mod test;
mod trace;

use sqlx::sqlite::SqlitePoolOptions;

pub use database::Database;

pub type AppState = State;

/// The shared application state.
///
/// Every request borrows a connection from the pool for as long as
/// a statement or transaction runs, then hands it back.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

#[tokio::main]
async fn main() {
	let config = config::Config::from_env().expect("invalid configuration");
	let _guard =
		trace::init_tracing_subscriber(config.otel_enabled).expect("failed to initialize tracing");

	let state = State {
		database: database::connect(
			SqlitePoolOptions::new().max_connections(config.database_max_connections),
			database::connect_options(&config.database_url).expect("DATABASE_URL is invalid"),
		)
		.await
		.expect("failed to connect to database"),
	};

	let app = route::router(state, config.cors_origins);

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on {}:{}", config.host, config.port);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(error) = tokio::signal::ctrl_c().await {
			tracing::error!("failed to listen for ctrl-c: {error}");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(error) => {
				tracing::error!("failed to listen for SIGTERM: {error}");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}
