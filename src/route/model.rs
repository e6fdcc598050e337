use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

/// Path parameters of routes under a single post.
#[derive(Debug, Clone, Copy, Deserialize, Validate, JsonSchema)]
pub struct PostPath {
	/// The unique identifier of the post.
	pub post_id: i64,
}

/// Path parameters of routes under a single comment.
#[derive(Debug, Clone, Copy, Deserialize, Validate, JsonSchema)]
pub struct CommentPath {
	/// The unique identifier of the post the comment belongs to.
	pub post_id: i64,
	/// The unique identifier of the comment.
	pub comment_id: i64,
}
