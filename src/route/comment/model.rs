pub use crate::route::model::{CommentPath, PostPath};

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single comment, attached to exactly one post.
#[model]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: i64,
	/// The post the comment was written under.
	#[serde(skip_deserializing)]
	pub post_id: i64,
	/// The name of the user that wrote the comment.
	#[model(immutable)]
	#[validate(length(min = 1))]
	pub user_name: String,
	/// The text of the comment.
	#[validate(length(min = 1))]
	pub content: String,
	/// The creation time of the comment.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The last time the content was changed.
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
}
