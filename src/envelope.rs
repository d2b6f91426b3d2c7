//! Uniform result shape for every platform call.
//!
//! A transport outcome (success or failure) is folded into a [`ResponseEnvelope`] that always
//! resolves: successful bodies become `data` (optionally projected, e.g. unwrapping `{ "data": X }`),
//! failures become `error` carrying the best available message. Status code and headers are copied
//! through whenever the request reached the platform; a network-level failure leaves both empty.

// self
use crate::{
	_prelude::*,
	error::TransportError,
	http::{Headers, RawResponse},
};

/// Normalized outcome of one platform call.
///
/// At most one of [`data`](Self::data) and [`error`](Self::error) is populated. Values are only
/// produced by the normalizer functions in this module.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
	data: Option<T>,
	error: Option<String>,
	status_code: Option<u16>,
	headers: Headers,
}
impl<T> ResponseEnvelope<T> {
	fn success(data: Option<T>, status: u16, headers: Headers) -> Self {
		Self { data, error: None, status_code: Some(status), headers }
	}

	fn failure(error: String, status_code: Option<u16>, headers: Headers) -> Self {
		Self { data: None, error: Some(error), status_code, headers }
	}

	/// Payload of a successful call; `None` when the body (or projected field) was absent.
	pub fn data(&self) -> Option<&T> {
		self.data.as_ref()
	}

	/// Failure message.
	pub fn error(&self) -> Option<&str> {
		self.error.as_deref()
	}

	/// HTTP status, absent only for network-level failures.
	pub fn status_code(&self) -> Option<u16> {
		self.status_code
	}

	/// Response headers; empty for network-level failures.
	pub fn headers(&self) -> &Headers {
		&self.headers
	}

	/// Returns `true` when no error was recorded.
	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}

	/// Consumes the envelope, returning its payload.
	pub fn into_data(self) -> Option<T> {
		self.data
	}

	/// Consumes the envelope into `Ok(data)` or `Err(message)`.
	pub fn into_result(self) -> std::result::Result<Option<T>, String> {
		match self.error {
			Some(error) => Err(error),
			None => Ok(self.data),
		}
	}

	/// Maps the payload, keeping status, headers, and error untouched.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseEnvelope<U> {
		ResponseEnvelope {
			data: self.data.map(f),
			error: self.error,
			status_code: self.status_code,
			headers: self.headers,
		}
	}
}

/// Page of list results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	/// Items on this page.
	pub data: Vec<T>,
	/// Continuation state.
	pub page_info: PageInfo,
}

/// Continuation state of a paginated listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
	/// Cursor to pass to the next call.
	pub cursor: Option<String>,
	/// Whether more items follow.
	pub has_more: bool,
}

/// Decodes the whole success body as `T`.
pub fn normalize<T>(outcome: Result<RawResponse, TransportError>) -> ResponseEnvelope<T>
where
	T: DeserializeOwned,
{
	normalize_with(outcome, |body| decode(body).map(Some))
}

/// Decodes the success body's `data` field as `T`.
pub fn normalize_data<T>(outcome: Result<RawResponse, TransportError>) -> ResponseEnvelope<T>
where
	T: DeserializeOwned,
{
	normalize_pointer(outcome, "/data")
}

/// Decodes the value at the JSON `pointer` (e.g. `/data/url`) of the success body as `T`.
pub fn normalize_pointer<T>(
	outcome: Result<RawResponse, TransportError>,
	pointer: &str,
) -> ResponseEnvelope<T>
where
	T: DeserializeOwned,
{
	normalize_with(outcome, |mut body| match body.pointer_mut(pointer).map(Value::take) {
		None | Some(Value::Null) => Ok(None),
		Some(value) => decode(value).map(Some),
	})
}

/// Extracts `data`, `cursor`, and `hasMore` from a list response.
pub fn normalize_page<T>(outcome: Result<RawResponse, TransportError>) -> ResponseEnvelope<Page<T>>
where
	T: DeserializeOwned,
{
	#[derive(Deserialize)]
	#[serde(rename_all = "camelCase", bound = "T: DeserializeOwned")]
	struct RawPage<T> {
		#[serde(default)]
		data: Option<Vec<T>>,
		#[serde(default)]
		cursor: Option<String>,
		#[serde(default)]
		has_more: bool,
	}

	normalize_with(outcome, |body| {
		let RawPage { data, cursor, has_more } = decode::<RawPage<T>>(body)?;

		Ok(Some(Page { data: data.unwrap_or_default(), page_info: PageInfo { cursor, has_more } }))
	})
}

/// Folds `outcome` into an envelope, projecting successful bodies with `project`.
///
/// `project` returns `Ok(None)` when the projected value is absent and `Err(message)` when it
/// cannot be decoded; the latter is recorded as the envelope's error.
pub fn normalize_with<T, F>(
	outcome: Result<RawResponse, TransportError>,
	project: F,
) -> ResponseEnvelope<T>
where
	F: FnOnce(Value) -> std::result::Result<Option<T>, String>,
{
	match outcome.and_then(RawResponse::error_for_status) {
		Ok(RawResponse { status, headers, body }) => match body.map(project).transpose() {
			Ok(data) => ResponseEnvelope::success(data.flatten(), status, headers),
			Err(message) => ResponseEnvelope::failure(message, Some(status), headers),
		},
		Err(e) => {
			let message = e.message();
			let status = e.status();
			let headers = e.headers().cloned().unwrap_or_default();

			ResponseEnvelope::failure(message, status, headers)
		},
	}
}

/// Decodes `value` as `T`, naming the offending JSON path on failure.
pub fn decode<T>(value: Value) -> std::result::Result<T, String>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|e| format!("Response body is not valid: {e}."))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn ok(body: Value) -> Result<RawResponse, TransportError> {
		let mut raw = RawResponse::new(200, Some(body));

		raw.headers.insert("x-request-id".into(), "r1".into());

		Ok(raw)
	}

	#[derive(Debug, PartialEq, Deserialize)]
	struct Link {
		url: String,
	}

	#[test]
	fn not_found_becomes_error_with_status_and_headers() {
		let mut headers = Headers::new();

		headers.insert("content-type".into(), "application/json".into());

		let outcome = Err(TransportError::Status {
			status: 404,
			headers: headers.clone(),
			body: Some(serde_json::json!({ "error": "not found" })),
		});
		let envelope = normalize_data::<Value>(outcome);

		assert_eq!(envelope.data(), None);
		assert_eq!(envelope.error(), Some("not found"));
		assert_eq!(envelope.status_code(), Some(404));
		assert_eq!(envelope.headers(), &headers);
	}

	#[test]
	fn raw_non_success_responses_are_failures() {
		let outcome = Ok(RawResponse::new(500, Some(serde_json::json!({ "message": "boom" }))));
		let envelope = normalize::<Value>(outcome);

		assert_eq!(envelope.into_result(), Err("boom".to_owned()));
	}

	#[test]
	fn network_failures_leave_status_and_headers_empty() {
		let outcome = Err(TransportError::from(std::io::Error::other("connection refused")));
		let envelope = normalize::<Value>(outcome);

		assert!(!envelope.is_success());
		assert_eq!(envelope.status_code(), None);
		assert!(envelope.headers().is_empty());
		assert!(envelope.error().is_some_and(|e| e.contains("connection refused")));
	}

	#[test]
	fn data_projection_unwraps_envelope() {
		let envelope =
			normalize_pointer::<String>(ok(serde_json::json!({ "data": { "url": "https://x" } })), "/data/url");

		assert_eq!(envelope.data().map(String::as_str), Some("https://x"));
		assert_eq!(envelope.status_code(), Some(200));
		assert_eq!(envelope.headers().get("x-request-id").map(String::as_str), Some("r1"));

		let nested = normalize_data::<Link>(ok(serde_json::json!({ "data": { "url": "https://y" } })));

		assert_eq!(nested.into_data(), Some(Link { url: "https://y".into() }));
	}

	#[test]
	fn absent_projection_is_empty_success() {
		let missing = normalize_data::<Value>(ok(serde_json::json!({ "other": 1 })));
		let null = normalize_data::<Value>(ok(serde_json::json!({ "data": null })));
		let empty = normalize::<Value>(Ok(RawResponse::new(204, None)));

		for envelope in [missing, null, empty] {
			assert!(envelope.is_success());
			assert_eq!(envelope.data(), None);
		}
	}

	#[test]
	fn undecodable_success_body_is_reported() {
		let envelope = normalize_data::<Link>(ok(serde_json::json!({ "data": { "url": 7 } })));

		assert_eq!(envelope.status_code(), Some(200));
		assert!(envelope.data().is_none());
		assert!(envelope.error().is_some_and(|e| e.contains("url")), "{envelope:?}");
	}

	#[test]
	fn pages_carry_cursor_and_has_more() {
		let envelope = normalize_page::<Value>(ok(serde_json::json!({
			"data": [{ "id": "a" }, { "id": "b" }],
			"cursor": "next",
			"hasMore": true,
		})));
		let page = envelope.into_data().expect("Page should be present.");

		assert_eq!(page.data.len(), 2);
		assert_eq!(page.page_info, PageInfo { cursor: Some("next".into()), has_more: true });

		let last = normalize_page::<Value>(ok(serde_json::json!({ "data": [] })))
			.into_data()
			.expect("Page should be present.");

		assert_eq!(last.page_info, PageInfo::default());
	}

	#[test]
	fn pages_decode_items_without_default() {
		let page = normalize_page::<Link>(ok(serde_json::json!({
			"data": [{ "url": "https://a" }],
			"cursor": null,
		})))
		.into_data()
		.expect("Page should be present.");

		assert_eq!(page.data, [Link { url: "https://a".into() }]);
		assert!(!page.page_info.has_more);
	}
}
