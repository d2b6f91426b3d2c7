//! Client configuration.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret},
	error::ConfigError,
};

/// Production platform endpoint.
pub const PROD_ENDPOINT: &str = "https://api.slashauth.com";

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct Config {
	client_id: ClientId,
	client_secret: ClientSecret,
	endpoint: Url,
	version: String,
}
impl Config {
	/// Starts a builder for the given application credentials.
	pub fn builder(client_id: ClientId, client_secret: impl Into<ClientSecret>) -> ConfigBuilder {
		ConfigBuilder::new(client_id, client_secret.into())
	}

	/// Application identifier.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Client secret used as the HMAC key.
	pub fn client_secret(&self) -> &ClientSecret {
		&self.client_secret
	}

	/// Platform endpoint.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Client version reported to the platform.
	pub fn version(&self) -> &str {
		&self.version
	}

	/// `User-Agent` sent with every request.
	pub fn user_agent(&self) -> String {
		format!("rust-client_{}", self.version)
	}
}

/// Builder for [`Config`] values.
#[derive(Debug)]
pub struct ConfigBuilder {
	/// Application identifier.
	pub client_id: ClientId,
	/// Client secret.
	pub client_secret: ClientSecret,
	/// Endpoint override; defaults to [`PROD_ENDPOINT`].
	pub endpoint: Option<String>,
	/// Version override; defaults to the crate version.
	pub version: Option<String>,
}
impl ConfigBuilder {
	/// Creates a new builder seeded with the application credentials.
	pub fn new(client_id: ClientId, client_secret: ClientSecret) -> Self {
		Self { client_id, client_secret, endpoint: None, version: None }
	}

	/// Overrides the platform endpoint.
	pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into());

		self
	}

	/// Overrides the reported client version.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		if self.client_secret.is_empty() {
			return Err(ConfigError::EmptySecret);
		}

		let raw = self.endpoint.as_deref().unwrap_or(PROD_ENDPOINT);
		let endpoint =
			Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { source })?;

		validate_endpoint(&endpoint)?;

		Ok(Config {
			client_id: self.client_id,
			client_secret: self.client_secret,
			endpoint,
			version: self.version.unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned()),
		})
	}
}

fn validate_endpoint(url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		None => false,
	};

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn client_id() -> ClientId {
		ClientId::new("app-1").expect("Client fixture should be valid.")
	}

	#[test]
	fn defaults_to_production_endpoint() {
		let config = Config::builder(client_id(), "shh").build().expect("Defaults should validate.");

		assert_eq!(config.endpoint().as_str(), "https://api.slashauth.com/");
		assert_eq!(config.user_agent(), format!("rust-client_{}", env!("CARGO_PKG_VERSION")));
	}

	#[test]
	fn version_override_changes_user_agent() {
		let config = Config::builder(client_id(), "shh")
			.version("9.9.9")
			.build()
			.expect("Version override should validate.");

		assert_eq!(config.user_agent(), "rust-client_9.9.9");
	}

	#[test]
	fn plain_http_is_limited_to_loopback() {
		for endpoint in ["http://127.0.0.1:8080", "http://localhost:3000", "http://[::1]:1"] {
			Config::builder(client_id(), "shh")
				.endpoint(endpoint)
				.build()
				.expect("Loopback endpoints may use HTTP.");
		}

		let err = Config::builder(client_id(), "shh")
			.endpoint("http://api.example.com")
			.build()
			.expect_err("Remote HTTP endpoints must be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { .. }));
	}

	#[test]
	fn empty_secret_and_bad_urls_are_rejected() {
		assert!(matches!(
			Config::builder(client_id(), "").build(),
			Err(ConfigError::EmptySecret)
		));
		assert!(matches!(
			Config::builder(client_id(), "shh").endpoint("not a url").build(),
			Err(ConfigError::InvalidEndpoint { .. })
		));
	}
}
