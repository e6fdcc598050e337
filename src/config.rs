use std::{net::IpAddr, str::FromStr};

use axum::http::HeaderValue;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{name} has an invalid value {value:?}")]
	Invalid { name: &'static str, value: String },
}

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
	pub database_url: String,
	pub database_max_connections: u32,
	pub host: IpAddr,
	pub port: u16,
	/// Origins allowed to make cross-origin requests, such as a browser frontend.
	pub cors_origins: Vec<HeaderValue>,
	/// Export traces and metrics over OTLP.
	pub otel_enabled: bool,
}

impl Config {
	/// Reads the configuration from the process environment, after loading `.env` if present.
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|name| std::env::var(name).ok())
	}

	fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_owned());

		Ok(Self {
			database_url: var("DATABASE_URL", "sqlite://app.db"),
			database_max_connections: parsed(
				"DATABASE_MAX_CONNECTIONS",
				var("DATABASE_MAX_CONNECTIONS", "5"),
			)?,
			host: parsed("HOST", var("HOST", "127.0.0.1"))?,
			port: parsed("PORT", var("PORT", "8000"))?,
			cors_origins: var("CORS_ORIGINS", "")
				.split(',')
				.map(str::trim)
				.filter(|origin| !origin.is_empty())
				.map(|origin| {
					HeaderValue::from_str(origin).map_err(|_| Error::Invalid {
						name: "CORS_ORIGINS",
						value: origin.to_owned(),
					})
				})
				.collect::<Result<_, _>>()?,
			otel_enabled: parsed("OTEL_ENABLED", var("OTEL_ENABLED", "false"))?,
		})
	}
}

fn parsed<T: FromStr>(name: &'static str, value: String) -> Result<T, Error> {
	value.parse().map_err(|_| Error::Invalid { name, value })
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(key, value)| (key.to_string(), value.to_string()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();

		assert_eq!(config.database_url, "sqlite://app.db");
		assert_eq!(config.database_max_connections, 5);
		assert_eq!(config.host.to_string(), "127.0.0.1");
		assert_eq!(config.port, 8000);
		assert!(config.cors_origins.is_empty());
		assert!(!config.otel_enabled);
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("DATABASE_URL", "sqlite::memory:"),
			("PORT", "3000"),
			("HOST", "0.0.0.0"),
			("CORS_ORIGINS", "http://localhost:5173, http://example.com"),
			("OTEL_ENABLED", "true"),
		])
		.unwrap();

		assert_eq!(config.database_url, "sqlite::memory:");
		assert_eq!(config.port, 3000);
		assert_eq!(config.host.to_string(), "0.0.0.0");
		assert_eq!(config.cors_origins.len(), 2);
		assert_eq!(config.cors_origins[0], "http://localhost:5173");
		assert!(config.otel_enabled);
	}

	#[test]
	fn test_invalid_port() {
		let error = config(&[("PORT", "eighty")]).unwrap_err();

		assert_eq!(error.to_string(), r#"PORT has an invalid value "eighty""#);
	}
}
