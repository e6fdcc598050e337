pub use axum_test::TestServer;
pub use chrono::{DateTime, Utc};
pub use serde_json::{json, Value};
pub use sqlx::sqlite::{
	SqliteConnectOptions as ConnectOptions, SqlitePoolOptions as PoolOptions,
};

pub use crate::Database;

use crate::{database, route, State};

/// Opens the test database handed out by `#[sqlx::test]`, with the tables created.
pub async fn database(pool: PoolOptions, options: ConnectOptions) -> Database {
	database::connect(pool, options)
		.await
		.expect("failed to open test database")
}

/// Builds the application on top of an already opened database.
pub fn server(database: Database) -> TestServer {
	TestServer::new(route::router(State { database }, Vec::new()))
		.expect("failed to start test server")
}

/// Builds the application against the test database handed out by `#[sqlx::test]`.
pub async fn app(pool: PoolOptions, options: ConnectOptions) -> TestServer {
	server(database(pool, options).await)
}
