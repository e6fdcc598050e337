use axum::extract::State;
use chrono::Utc;
use macros::route;

use crate::{
	error,
	extract::{Created, Json, NoContent, Path},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

/// Get comments
/// Returns every comment under a post. A post without comments, or one
/// that does not exist, has an empty list.
#[route(tag = tag::COMMENT)]
pub async fn get_comments(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<Vec<model::Comment>>, RouteError> {
	let comments =
		sqlx::query_as::<_, model::Comment>("SELECT * FROM comments WHERE postId = $1")
			.bind(path.post_id)
			.fetch_all(&database)
			.await?;

	Ok(Json(comments))
}

/// Create comment
/// Creates a comment under a post and adds one to the post's comment count.
#[route(
	tag = tag::COMMENT,
	response(status = 201, shape = "Json<model::Comment>", description = "The created comment."),
	response(status = 404, shape = "Json<error::Message>", description = "The post does not exist.")
)]
pub async fn create_comment(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::CreateComment>,
) -> Result<Created<model::Comment>, RouteError> {
	let mut transaction = database.begin().await?;

	let status = sqlx::query("UPDATE posts SET commentCount = commentCount + 1 WHERE id = $1")
		.bind(path.post_id)
		.execute(&mut *transaction)
		.await?;

	// dropping the transaction rolls it back
	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost(path.post_id).into());
	}

	let now = Utc::now();
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			INSERT INTO comments (postId, userName, content, createdAt, updatedAt)
			VALUES ($1, $2, $3, $4, $4)
			RETURNING *
		"#,
	)
	.bind(path.post_id)
	.bind(&input.user_name)
	.bind(&input.content)
	.bind(now)
	.fetch_one(&mut *transaction)
	.await?;

	transaction.commit().await?;

	tracing::info!(post = comment.post_id, comment = comment.id, "created comment");

	Ok(Created(comment))
}

/// Get single comment
/// Returns a single comment by its post and unique id.
#[route(tag = tag::COMMENT, response(status = 404, shape = "Json<error::Message>", description = "The comment does not exist under the post."))]
pub async fn get_comment(
	State(database): State<Database>,
	Path(path): Path<model::CommentPath>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		"SELECT * FROM comments WHERE postId = $1 AND id = $2",
	)
	.bind(path.post_id)
	.bind(path.comment_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment {
		post: path.post_id,
		comment: path.comment_id,
	})?))
}

/// Update comment
/// Replaces the content of a comment. The author is left untouched.
#[route(tag = tag::COMMENT, response(status = 404, shape = "Json<error::Message>", description = "The comment does not exist under the post."))]
pub async fn update_comment(
	State(database): State<Database>,
	Path(path): Path<model::CommentPath>,
	Json(input): Json<model::UpdateComment>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(
		r#"
			UPDATE comments
			SET content = $1, updatedAt = $2
			WHERE postId = $3 AND id = $4
			RETURNING *
		"#,
	)
	.bind(&input.content)
	.bind(Utc::now())
	.bind(path.post_id)
	.bind(path.comment_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment {
		post: path.post_id,
		comment: path.comment_id,
	})?))
}

/// Delete comment
/// Deletes a comment and takes one off its post's comment count.
#[route(tag = tag::COMMENT, response(status = 404, shape = "Json<error::Message>", description = "The comment does not exist under the post."))]
pub async fn delete_comment(
	State(database): State<Database>,
	Path(path): Path<model::CommentPath>,
) -> Result<NoContent, RouteError> {
	let mut transaction = database.begin().await?;

	let status = sqlx::query("DELETE FROM comments WHERE postId = $1 AND id = $2")
		.bind(path.post_id)
		.bind(path.comment_id)
		.execute(&mut *transaction)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownComment {
			post: path.post_id,
			comment: path.comment_id,
		}
		.into());
	}

	// No floor at zero: the count follows the rows, not the other way around.
	sqlx::query("UPDATE posts SET commentCount = commentCount - 1 WHERE id = $1")
		.bind(path.post_id)
		.execute(&mut *transaction)
		.await?;

	transaction.commit().await?;

	tracing::info!(post = path.post_id, comment = path.comment_id, "deleted comment");

	Ok(NoContent)
}

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn create_post(server: &TestServer) {
		let response = server
			.post("/api/posts")
			.json(&json!({ "userName": "alice", "content": "hi" }))
			.await;

		assert_eq!(response.status_code(), 201);
	}

	async fn comment_count(server: &TestServer, post: i64) -> Value {
		server.get(&format!("/api/posts/{post}")).await.json::<Value>()["commentCount"].clone()
	}

	#[sqlx::test]
	async fn test_comment_scenario(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;

		let response = server
			.post("/api/posts/1/comments")
			.json(&json!({ "userName": "bob", "content": "hey" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment = response.json::<Value>();

		assert_eq!(comment["id"], 1);
		assert_eq!(comment["postId"], 1);
		assert_eq!(comment["userName"], "bob");
		assert_eq!(comment["content"], "hey");
		assert_eq!(comment["createdAt"], comment["updatedAt"]);
		assert_eq!(comment_count(&server, 1).await, 1);

		let response = server.delete("/api/posts/1/comments/1").await;

		assert_eq!(response.status_code(), 204);
		assert_eq!(comment_count(&server, 1).await, 0);
	}

	#[sqlx::test]
	async fn test_comment_on_missing_post(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;

		let response = server
			.post("/api/posts/2/comments")
			.json(&json!({ "userName": "bob", "content": "hey" }))
			.await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<Value>()["details"]["postId"], 2);

		let response = server.get("/api/posts/2/comments").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>(), json!([]));
		assert_eq!(comment_count(&server, 1).await, 0);

		// the rolled back insert must not leave a row behind under its id
		let response = server
			.post("/api/posts/1/comments")
			.json(&json!({ "userName": "bob", "content": "hey" }))
			.await;

		assert_eq!(response.json::<Value>()["id"], 1);
	}

	#[sqlx::test]
	async fn test_list_comments(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;
		create_post(&server).await;

		for (post, content) in [(1, "a"), (2, "b"), (1, "c")] {
			server
				.post(&format!("/api/posts/{post}/comments"))
				.json(&json!({ "userName": "bob", "content": content }))
				.await;
		}

		let comments = server.get("/api/posts/1/comments").await.json::<Vec<Value>>();

		assert_eq!(comments.len(), 2);
		assert!(comments.iter().all(|comment| comment["postId"] == 1));
		assert_eq!(comment_count(&server, 1).await, 2);
		assert_eq!(comment_count(&server, 2).await, 1);
	}

	#[sqlx::test]
	async fn test_comment_belongs_to_post(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;
		create_post(&server).await;

		server
			.post("/api/posts/1/comments")
			.json(&json!({ "userName": "bob", "content": "hey" }))
			.await;

		let response = server.get("/api/posts/1/comments/1").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<Value>()["content"], "hey");

		let response = server.get("/api/posts/2/comments/1").await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(response.json::<Value>()["details"]["commentId"], 1);

		let response = server
			.patch("/api/posts/2/comments/1")
			.json(&json!({ "content": "edited" }))
			.await;

		assert_eq!(response.status_code(), 404);

		let response = server.delete("/api/posts/2/comments/1").await;

		assert_eq!(response.status_code(), 404);
		assert_eq!(comment_count(&server, 1).await, 1);
		assert_eq!(comment_count(&server, 2).await, 0);
	}

	#[sqlx::test]
	async fn test_update_comment(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;

		let created = server
			.post("/api/posts/1/comments")
			.json(&json!({ "userName": "bob", "content": "hey" }))
			.await
			.json::<Value>();

		std::thread::sleep(std::time::Duration::from_millis(5));

		let response = server
			.patch("/api/posts/1/comments/1")
			.json(&json!({ "content": "edited" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let updated = response.json::<Value>();

		assert_eq!(updated["content"], "edited");
		assert_eq!(updated["userName"], "bob");
		assert_eq!(updated["createdAt"], created["createdAt"]);
		assert_ne!(updated["updatedAt"], created["updatedAt"]);

		let response = server
			.patch("/api/posts/1/comments/1")
			.json(&json!({ "content": "" }))
			.await;

		assert_eq!(response.status_code(), 400);
	}

	#[sqlx::test]
	async fn test_orphaned_comments(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;

		server
			.post("/api/posts/1/comments")
			.json(&json!({ "userName": "bob", "content": "hey" }))
			.await;

		let response = server.delete("/api/posts/1").await;

		assert_eq!(response.status_code(), 204);

		let comments = server.get("/api/posts/1/comments").await.json::<Vec<Value>>();

		assert_eq!(comments.len(), 1);

		let response = server.delete("/api/posts/1/comments/1").await;

		assert_eq!(response.status_code(), 204);
	}

	#[sqlx::test]
	async fn test_delete_comment_below_zero(pool: PoolOptions, options: ConnectOptions) {
		let database = database(pool, options).await;
		let server = server(database.clone());

		create_post(&server).await;

		// a row written behind the counter's back leaves commentCount at 0
		sqlx::query(
			r#"
				INSERT INTO comments (postId, userName, content, createdAt, updatedAt)
				VALUES (1, 'bob', 'hey', $1, $1)
			"#,
		)
		.bind(Utc::now())
		.execute(&database)
		.await
		.unwrap();

		assert_eq!(comment_count(&server, 1).await, 0);

		let response = server.delete("/api/posts/1/comments/1").await;

		assert_eq!(response.status_code(), 204);
		assert_eq!(comment_count(&server, 1).await, -1);
	}

	#[sqlx::test]
	async fn test_rejects_empty_comment_fields(pool: PoolOptions, options: ConnectOptions) {
		let server = app(pool, options).await;

		create_post(&server).await;

		for body in [
			json!({ "userName": "", "content": "hey" }),
			json!({ "userName": "bob", "content": "" }),
			json!({ "content": "hey" }),
			json!({ "userName": "bob" }),
		] {
			let response = server.post("/api/posts/1/comments").json(&body).await;

			assert_eq!(response.status_code(), 400);
			assert!(response.json::<Value>()["message"].is_string());
		}

		assert_eq!(comment_count(&server, 1).await, 0);
		assert_eq!(
			server.get("/api/posts/1/comments").await.json::<Value>(),
			json!([])
		);
	}
}
