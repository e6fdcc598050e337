use std::{sync::Arc, time::Duration};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{
	http::{HeaderValue, Response},
	Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::{AllowOrigin, Any, CorsLayer},
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{openapi, AppState};

pub mod comment;
pub mod docs;
pub mod model;
pub mod post;

/// Builds the full application, including the generated API documentation.
pub fn router(state: AppState, cors_origins: Vec<HeaderValue>) -> Router {
	aide::gen::on_error(|error| tracing::error!("{error}"));
	aide::gen::extract_schemas(true);

	let mut api = OpenApi::default();

	let posts = ApiRouter::new()
		.merge(post::routes())
		.merge(comment::routes());

	ApiRouter::new()
		.nest("/api/posts", posts)
		.nest_api_service("/docs", docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(TraceLayer::new_for_http().on_response(
					|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
						tracing::info!(
							histogram.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
							status = response.status().as_u16(),
							"finished request"
						);
					},
				))
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(
					CorsLayer::new()
						.allow_origin(AllowOrigin::list(cors_origins))
						.allow_methods(Any)
						.allow_headers(Any),
				),
		)
		.with_state(state)
}
