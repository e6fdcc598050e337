use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(i64),
	#[error("unknown comment {comment} on post {post}")]
	UnknownComment { post: i64, comment: i64 },
}

pub type RouteError = error::RouteError<Error>;

impl From<Error> for RouteError {
	fn from(error: Error) -> Self {
		Self::Route(error)
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/:post_id/comments",
			get_with(get_comments, get_comments_docs).post_with(create_comment, create_comment_docs),
		)
		.api_route(
			"/:post_id/comments/:comment_id",
			get_with(get_comment, get_comment_docs)
				.patch_with(update_comment, update_comment_docs)
				.delete_with(delete_comment, delete_comment_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) | Self::UnknownComment { .. } => StatusCode::NOT_FOUND,
		}
	}

	fn into_message(self) -> error::Message {
		match self {
			Self::UnknownPost(post) => {
				error::Message::new("The post could not be found.").detail("postId", post)
			}
			Self::UnknownComment { post, comment } => {
				error::Message::new("The comment or post could not be found.")
					.detail("postId", post)
					.detail("commentId", comment)
			}
		}
	}
}
