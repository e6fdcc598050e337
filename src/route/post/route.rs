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

/// Get all posts
/// Returns every post in storage order.
#[route(tag = tag::POST)]
pub async fn get_posts(
	State(database): State<Database>,
) -> Result<Json<Vec<model::Post>>, RouteError> {
	let posts = sqlx::query_as::<_, model::Post>("SELECT * FROM posts")
		.fetch_all(&database)
		.await?;

	Ok(Json(posts))
}

/// Create post
/// Creates a new post with no likes and no comments.
#[route(tag = tag::POST, response(status = 201, shape = "Json<model::Post>", description = "The created post."))]
pub async fn create_post(
	State(database): State<Database>,
	Json(input): Json<model::CreatePost>,
) -> Result<Created<model::Post>, RouteError> {
	let now = Utc::now();
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			INSERT INTO posts (userName, content, createdAt, updatedAt, likeCount, commentCount)
			VALUES ($1, $2, $3, $3, 0, 0)
			RETURNING *
		"#,
	)
	.bind(&input.user_name)
	.bind(&input.content)
	.bind(now)
	.fetch_one(&database)
	.await?;

	tracing::info!(post = post.id, user = %post.user_name, "created post");

	Ok(Created(post))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST, response(status = 404, shape = "Json<error::Message>", description = "The post does not exist."))]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>("SELECT * FROM posts WHERE id = $1")
		.bind(path.post_id)
		.fetch_optional(&database)
		.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.post_id))?))
}

/// Update post
/// Replaces the content of a post. The author and counters are left untouched.
#[route(tag = tag::POST, response(status = 404, shape = "Json<error::Message>", description = "The post does not exist."))]
pub async fn update_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::UpdatePost>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			UPDATE posts
			SET content = $1, updatedAt = $2
			WHERE id = $3
			RETURNING *
		"#,
	)
	.bind(&input.content)
	.bind(Utc::now())
	.bind(path.post_id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.post_id))?))
}

/// Delete post
/// Deletes a post by its unique id. Its comments are kept.
#[route(tag = tag::POST, response(status = 404, shape = "Json<error::Message>", description = "The post does not exist."))]
pub async fn delete_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<NoContent, RouteError> {
	let status = sqlx::query("DELETE FROM posts WHERE id = $1")
		.bind(path.post_id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost(path.post_id).into());
	}

	tracing::info!(post = path.post_id, "deleted post");

	Ok(NoContent)
}

/// Like post
/// Adds one like to a post. Repeated likes, by the same user or not, all count.
#[route(
	tag = tag::LIKE,
	response(status = 201, shape = "Json<model::Post>", description = "The liked post."),
	response(status = 404, shape = "Json<error::Message>", description = "The post does not exist.")
)]
pub async fn like_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
	Json(input): Json<model::LikeInput>,
) -> Result<Created<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r#"
			UPDATE posts
			SET likeCount = likeCount + 1
			WHERE id = $1
			RETURNING *
		"#,
	)
	.bind(path.post_id)
	.fetch_optional(&database)
	.await?
	.ok_or(Error::UnknownPost(path.post_id))?;

	tracing::debug!(post = post.id, user = %input.user_name, likes = post.like_count, "liked post");

	Ok(Created(post))
}

/// Unlike post
/// Removes one like from a post. A post without likes is treated as not found.
#[route(
	tag = tag::LIKE,
	response(status = 404, shape = "Json<error::Message>", description = "The post does not exist or has no likes.")
)]
pub async fn unlike_post(
	State(database): State<Database>,
	Path(path): Path<model::PostPath>,
) -> Result<NoContent, RouteError> {
	let status = sqlx::query(
		r#"
			UPDATE posts
			SET likeCount = likeCount - 1
			WHERE id = $1 AND likeCount > 0
		"#,
	)
	.bind(path.post_id)
	.execute(&database)
	.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost(path.post_id).into());
	}

	Ok(NoContent)
}
