use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const LIKE: &str = "Like";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Feed API")
		.summary("Posts, comments and likes for a simple social feed")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments under a post".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::LIKE.into(),
			description: Some("Like counters of a post".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::Message>, _>(|res| {
			res.example(error::Message::new("error message").detail("postId", 1))
		})
}
