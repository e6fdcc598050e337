pub use crate::route::model::PostPath;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single post in the feed.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The name of the user that wrote the post.
	#[model(immutable)]
	#[validate(length(min = 1))]
	pub user_name: String,
	/// The text of the post.
	#[validate(length(min = 1))]
	pub content: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The last time the content was changed.
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
	/// The number of likes the post has received.
	#[serde(skip_deserializing)]
	pub like_count: i64,
	/// The number of comments under the post.
	#[serde(skip_deserializing)]
	pub comment_count: i64,
}

/// The user liking a post. Likes are counted, not recorded per user.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeInput {
	#[validate(length(min = 1))]
	pub user_name: String,
}
