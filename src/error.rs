use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::PathRejection,
	http::{Response, StatusCode},
	response::IntoResponse,
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::JsonSchema;
use serde::Serialize;

use crate::extract::Json;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message {
	/// A human-readable description of the error.
	pub message: Cow<'static, str>,
	/// The input field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'static, str>>,
	/// Additional machine-readable context, such as the id that was not found.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl Message {
	pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
		Self {
			message: message.into(),
			field: None,
			details: None,
		}
	}

	#[must_use]
	pub fn field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	#[must_use]
	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), value.into());
		self
	}
}

/// Describes how a route-specific error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;
	fn into_message(self) -> Message;
}

/// Errors that can occur in any route.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("invalid json body")]
	Json(JsonSchemaRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl From<JsonSchemaRejection> for AppError {
	fn from(rejection: JsonSchemaRejection) -> Self {
		Self::Json(rejection)
	}
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Json(..) | Self::Path(..) => StatusCode::BAD_REQUEST,
			Self::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_message(self) -> Message {
		match self {
			Self::Validation(errors) => {
				let mut fields = errors.field_errors().into_iter().flat_map(|(field, errors)| {
					errors.iter().map(move |error| (field.to_string(), error.to_string()))
				});

				match fields.next() {
					Some((field, error)) => Message::new(format!("{field}: {error}")).field(field),
					None => Message::new("validation failed"),
				}
			}
			Self::Json(rejection) => json_message(rejection),
			Self::Path(rejection) => Message::new(rejection.body_text()),
			Self::Database(..) => Message::new("an internal error occurred"),
		}
	}
}

/// Describes the first problem with a request body, pointing at the offending field when known.
fn json_message(rejection: JsonSchemaRejection) -> Message {
	match rejection {
		JsonSchemaRejection::Json(rejection) => Message::new(rejection.body_text()),
		JsonSchemaRejection::Serde(error) => {
			let field = error.path().to_string();

			Message::new(error.into_inner().to_string()).field(field)
		}
		JsonSchemaRejection::Schema(errors) => {
			let Some(error) = errors.front() else {
				return Message::new("the request body does not match its schema");
			};

			let message = Message::new(error.error_description().to_string());
			let field = error.instance_location().to_string();

			match field.trim_start_matches('/') {
				"" => message,
				field => message.field(field.to_owned()),
			}
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		let status = self.status();

		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		}

		(status, Json(self.into_message())).into_response()
	}
}

/// An error returned from a route, either specific to that route or
/// one shared by all of them.
#[derive(Debug, thiserror::Error)]
pub enum RouteError<T> {
	#[error(transparent)]
	App(#[from] AppError),
	#[error(transparent)]
	Route(T),
}

impl<T> From<sqlx::Error> for RouteError<T> {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

impl<T> IntoResponse for RouteError<T>
where
	T: ErrorShape,
{
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => (error.status(), Json(error.into_message())).into_response(),
		}
	}
}

impl<T> OperationOutput for RouteError<T> {
	type Inner = Message;
}
