use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type Database = sqlx::Pool<sqlx::Sqlite>;

const CREATE_POSTS: &str = r#"
	CREATE TABLE IF NOT EXISTS posts (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		userName TEXT NOT NULL,
		content TEXT NOT NULL,
		createdAt TEXT NOT NULL,
		updatedAt TEXT NOT NULL,
		likeCount INTEGER NOT NULL DEFAULT 0,
		commentCount INTEGER NOT NULL DEFAULT 0
	)
"#;

const CREATE_COMMENTS: &str = r#"
	CREATE TABLE IF NOT EXISTS comments (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		postId INTEGER NOT NULL,
		userName TEXT NOT NULL,
		content TEXT NOT NULL,
		createdAt TEXT NOT NULL,
		updatedAt TEXT NOT NULL,
		FOREIGN KEY(postId) REFERENCES posts(id)
	)
"#;

/// Parses a database url, creating the database file if it does not exist.
pub fn connect_options(url: &str) -> Result<SqliteConnectOptions, sqlx::Error> {
	Ok(SqliteConnectOptions::from_str(url)?.create_if_missing(true))
}

/// Opens a connection pool and creates the tables if they are missing.
///
/// Foreign keys are not enforced, so deleting a post leaves its comments behind.
pub async fn connect(
	pool: SqlitePoolOptions,
	options: SqliteConnectOptions,
) -> Result<Database, sqlx::Error> {
	let database = pool.connect_with(options.foreign_keys(false)).await?;

	init(&database).await?;

	Ok(database)
}

/// Creates the tables. Running this against an existing database is a no-op.
pub async fn init(database: &Database) -> Result<(), sqlx::Error> {
	let mut transaction = database.begin().await?;

	sqlx::query(CREATE_POSTS).execute(&mut *transaction).await?;
	sqlx::query(CREATE_COMMENTS).execute(&mut *transaction).await?;

	transaction.commit().await
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_init_is_idempotent(pool: PoolOptions, options: ConnectOptions) {
		let database = super::connect(pool, options).await.unwrap();

		sqlx::query(
			"INSERT INTO posts (userName, content, createdAt, updatedAt) VALUES ('alice', 'hi', '', '')",
		)
		.execute(&database)
		.await
		.unwrap();

		super::init(&database).await.unwrap();

		let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
			.fetch_one(&database)
			.await
			.unwrap();

		assert_eq!(count, 1);
	}
}
