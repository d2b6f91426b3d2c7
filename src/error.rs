//! Client-level error types shared across signing, transport, and resource callers.

// self
use crate::{_prelude::*, http::Headers};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identifier failed validation before it could be placed in a request path.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// Request payload could not be signed.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// Transport failure (network, non-success status, undecodable body).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token string lacks a parsable claims segment.
	#[error("Token is malformed: {reason}.")]
	MalformedToken {
		/// Human-readable description of the structural problem.
		reason: String,
	},
	/// Remote validation endpoint did not confirm the token.
	#[error("Token is not valid.")]
	InvalidToken {
		/// HTTP status reported by the validation endpoint, when one was received.
		status: Option<u16>,
	},
	/// Authorization header is missing or not of the form `Bearer <token>`.
	#[error("Authorization header is not parsable.")]
	MalformedAuthHeader,
	/// Caller passed a value outside an accepted enumeration.
	#[error("Unsupported value `{value}` for {field}.")]
	UnsupportedValue {
		/// Field or enumeration the value was checked against.
		field: &'static str,
		/// Rejected value.
		value: String,
	},
	/// The wallet of a user-handle subject could not be looked up.
	#[error("Failed to look up the wallet of {user_id}: {reason}.")]
	WalletLookup {
		/// User handle the lookup was for.
		user_id: String,
		/// Failure reported by the platform.
		reason: String,
	},
	/// The composite file upload aborted before a file record was created.
	#[error("Failed to upload file: {reason}.")]
	UploadFailure {
		/// Step that failed and why.
		reason: String,
	},
}

/// Configuration and validation failures raised while building a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint cannot be parsed as an absolute URL.
	#[error("Endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint uses plain HTTP against a non-loopback host.
	#[error("The endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Client secret was empty.
	#[error("Client secret cannot be empty.")]
	EmptySecret,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised while producing a signed query or body.
#[derive(Debug, ThisError)]
pub enum SigningError {
	/// Query inputs must already be strings; the value under `key` was not.
	#[error("Query parameter `{key}` must be a string.")]
	NonStringValue {
		/// Offending input key.
		key: String,
	},
	/// The secret could not be used as an HMAC key.
	#[error("Client secret cannot be used as an HMAC key.")]
	InvalidKey,
	/// Canonical JSON serialization failed.
	#[error("Body could not be serialized for signing.")]
	Serialize(#[from] serde_json::Error),
}

/// Transport-level failures (non-success status, network, decoding, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// The platform answered with a non-success status code.
	#[error("Failed request: ({status}).")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response headers (lower-cased names).
		headers: Headers,
		/// Parsed response body, when it was valid JSON.
		body: Option<Value>,
	},
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// A success response carried a body that was not valid JSON.
	#[error("Response body is not valid JSON.")]
	Decode {
		/// HTTP status code.
		status: u16,
		/// Response headers (lower-cased names).
		headers: Headers,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the platform.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status code, when the request reached the platform.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::Network { .. } | Self::Io(_) => None,
		}
	}

	/// Response headers, when the request reached the platform.
	pub fn headers(&self) -> Option<&Headers> {
		match self {
			Self::Status { headers, .. } | Self::Decode { headers, .. } => Some(headers),
			Self::Network { .. } | Self::Io(_) => None,
		}
	}

	/// Best available human-readable message.
	///
	/// Prefers the body's `error` field, then its `message` field, then the transport's own
	/// description.
	pub fn message(&self) -> String {
		if let Self::Status { body: Some(body), .. } = self {
			for field in ["error", "message"] {
				if let Some(message) = body.get(field).and_then(Value::as_str) {
					return message.to_owned();
				}
			}
		}

		match self.source() {
			Some(source) => format!("{self} {source}"),
			None => self.to_string(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
