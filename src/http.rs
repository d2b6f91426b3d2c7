//! Transport capability consumed by the resource callers.
//!
//! [`RestTransport`] is the crate's only dependency on an HTTP stack. Implementations receive a
//! fully signed [`TransportRequest`] (path relative to the platform endpoint, query pairs in wire
//! order, extra headers, optional JSON body) and resolve to a [`RawResponse`] or a
//! [`TransportError`]. Non-success statuses must surface as [`TransportError::Status`] so the
//! envelope normalizer can recover the platform's error message; [`RawResponse::error_for_status`]
//! performs that mapping for implementations that receive raw responses.
//!
//! [`BlobUploader`] covers the one call that leaves the platform: the binary `PUT` to a
//! presigned storage URL during a file upload.

// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")]
use {
	crate::error::ConfigError,
	reqwest::{
		Method as ReqwestMethod,
		header::{CONTENT_TYPE, HeaderMap, USER_AGENT},
	},
};

/// Response headers keyed by lower-case name; repeated headers are joined with `, `.
pub type Headers = BTreeMap<String, String>;

/// Boxed future returned by [`RestTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Boxed future returned by [`BlobUploader::put`].
pub type UploadFuture<'a> = Pin<Box<dyn Future<Output = Result<(), TransportError>> + 'a + Send>>;

/// HTTP verbs used by the platform API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Upper-case verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request handed to a [`RestTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransportRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute path below the platform endpoint, e.g. `/s/app/users`.
	pub path: String,
	/// Query pairs in wire order.
	pub query: Vec<(String, String)>,
	/// Additional request headers.
	pub headers: Headers,
	/// JSON body, when the verb carries one.
	pub body: Option<Value>,
}
impl TransportRequest {
	/// Creates a request without query, headers, or body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), headers: Headers::new(), body: None }
	}

	/// Sets the query pairs.
	pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
		self.query = query;

		self
	}

	/// Adds a request header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Sets the JSON body.
	pub fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Value of the query parameter `key`, if present.
	pub fn query_param(&self, key: &str) -> Option<&str> {
		self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}
}

/// Response produced by a [`RestTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: Headers,
	/// Parsed JSON body; `None` when the body was empty.
	pub body: Option<Value>,
}
impl RawResponse {
	/// Creates a response with the given status and body and no headers.
	pub fn new(status: u16, body: Option<Value>) -> Self {
		Self { status, headers: Headers::new(), body }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Converts non-2xx responses into [`TransportError::Status`].
	pub fn error_for_status(self) -> Result<Self, TransportError> {
		if self.is_success() {
			Ok(self)
		} else {
			Err(TransportError::Status { status: self.status, headers: self.headers, body: self.body })
		}
	}
}

/// REST capability over the platform API.
///
/// Only [`execute`](RestTransport::execute) is required; the verb helpers mirror the platform
/// client's `get`/`create`/`replace`/`update`/`del` surface.
pub trait RestTransport
where
	Self: Send + Sync,
{
	/// Executes `request`, resolving non-2xx statuses to [`TransportError::Status`].
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_>;

	/// `GET` with query parameters and extra headers.
	fn get(
		&self,
		path: String,
		query: Vec<(String, String)>,
		headers: Headers,
	) -> TransportFuture<'_> {
		let mut request = TransportRequest::new(Method::Get, path).with_query(query);

		request.headers = headers;

		self.execute(request)
	}

	/// `POST` with a JSON body.
	fn create(&self, path: String, body: Value) -> TransportFuture<'_> {
		self.execute(TransportRequest::new(Method::Post, path).with_body(body))
	}

	/// `PUT` with a JSON body.
	fn replace(&self, path: String, body: Value) -> TransportFuture<'_> {
		self.execute(TransportRequest::new(Method::Put, path).with_body(body))
	}

	/// `PATCH` with a JSON body.
	fn update(&self, path: String, body: Value) -> TransportFuture<'_> {
		self.execute(TransportRequest::new(Method::Patch, path).with_body(body))
	}

	/// `DELETE` with query parameters.
	fn del(&self, path: String, query: Vec<(String, String)>) -> TransportFuture<'_> {
		self.execute(TransportRequest::new(Method::Delete, path).with_query(query))
	}
}

/// Uploads raw bytes to a presigned storage URL.
pub trait BlobUploader
where
	Self: Send + Sync,
{
	/// `PUT`s `bytes` to `url` with the given `Content-Type`.
	fn put<'a>(&'a self, url: &'a str, content_type: &'a str, bytes: Vec<u8>) -> UploadFuture<'a>;
}

/// Builds the `Authorization` header value for bearer-authenticated calls.
pub fn bearer(token: &str) -> String {
	format!("Bearer {token}")
}

/// reqwest-backed [`RestTransport`] and [`BlobUploader`].
///
/// Paths are appended to the configured endpoint and every request carries the client's
/// `User-Agent`.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	endpoint: Url,
	user_agent: String,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a fresh reqwest client.
	pub fn new(endpoint: Url, user_agent: impl Into<String>) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().build()?;

		Ok(Self::with_client(client, endpoint, user_agent))
	}

	/// Wraps an existing reqwest client.
	pub fn with_client(client: ReqwestClient, endpoint: Url, user_agent: impl Into<String>) -> Self {
		Self { client, endpoint, user_agent: user_agent.into() }
	}

	/// Platform endpoint requests are resolved against.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	fn url_for(&self, path: &str, query: &[(String, String)]) -> Url {
		let mut url = self.endpoint.clone();
		let joined = format!("{}{}", url.path().trim_end_matches('/'), path);

		url.set_path(&joined);
		url.set_query(None);

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query);
		}

		url
	}

	async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportError> {
		let url = self.url_for(&request.path, &request.query);
		let mut builder = self
			.client
			.request(reqwest_method(request.method), url)
			.header(USER_AGENT, &self.user_agent);

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = &request.body {
			let bytes = serde_json::to_vec(body).map_err(std::io::Error::from)?;

			builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let headers = collect_headers(response.headers());
		let bytes = response.bytes().await?;
		let body = if bytes.iter().all(u8::is_ascii_whitespace) {
			None
		} else {
			match serde_json::from_slice::<Value>(&bytes) {
				Ok(value) => Some(value),
				Err(source) if (200..300).contains(&status) =>
					return Err(TransportError::Decode { status, headers, source }),
				// Error bodies that are not JSON only lose their structured message.
				Err(_) => None,
			}
		};

		RawResponse { status, headers, body }.error_for_status()
	}
}
#[cfg(feature = "reqwest")]
impl RestTransport for ReqwestTransport {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		Box::pin(self.send(request))
	}
}
#[cfg(feature = "reqwest")]
impl BlobUploader for ReqwestTransport {
	fn put<'a>(&'a self, url: &'a str, content_type: &'a str, bytes: Vec<u8>) -> UploadFuture<'a> {
		Box::pin(async move {
			let response =
				self.client.put(url).header(CONTENT_TYPE, content_type).body(bytes).send().await?;
			let status = response.status().as_u16();
			let headers = collect_headers(response.headers());

			RawResponse { status, headers, body: None }.error_for_status().map(|_| ())
		})
	}
}

#[cfg(feature = "reqwest")]
fn reqwest_method(method: Method) -> ReqwestMethod {
	match method {
		Method::Get => ReqwestMethod::GET,
		Method::Post => ReqwestMethod::POST,
		Method::Put => ReqwestMethod::PUT,
		Method::Patch => ReqwestMethod::PATCH,
		Method::Delete => ReqwestMethod::DELETE,
	}
}

#[cfg(feature = "reqwest")]
fn collect_headers(map: &HeaderMap) -> Headers {
	let mut headers = Headers::new();

	for (name, value) in map {
		let Ok(value) = value.to_str() else { continue };

		headers
			.entry(name.as_str().to_owned())
			.and_modify(|joined: &mut String| {
				joined.push_str(", ");
				joined.push_str(value);
			})
			.or_insert_with(|| value.to_owned());
	}

	headers
}
