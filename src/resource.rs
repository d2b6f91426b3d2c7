//! Resource callers: one method per platform operation.
//!
//! Every caller shares a [`Context`] holding the application credentials and the transport. A
//! call builds its input, signs it (query for `GET`/`DELETE`, body for `POST`/`PUT`/`PATCH`),
//! hands the request to the transport inside an observability span, and folds the outcome into a
//! [`ResponseEnvelope`](crate::envelope::ResponseEnvelope). The outer `Result` only reports
//! pre-flight failures (signing, identifiers); transport failures live in the envelope.

pub mod apps;
pub mod files;
pub mod organizations;
pub mod users;

pub use apps::*;
pub use files::*;
pub use organizations::*;
pub use users::*;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, OrganizationId},
	error::TransportError,
	http::{RawResponse, RestTransport, TransportRequest},
	model,
	obs::{self, CallOutcome, CallSpan, Resource},
	sign::{self, QueryInput},
};

/// Application credentials plus the transport shared by all resource callers.
pub struct Context<T>
where
	T: ?Sized,
{
	client_id: ClientId,
	secret: ClientSecret,
	transport: Arc<T>,
}
impl<T> Context<T>
where
	T: ?Sized + RestTransport,
{
	/// Bundles credentials with a transport.
	pub fn new(client_id: ClientId, secret: ClientSecret, transport: Arc<T>) -> Self {
		Self { client_id, secret, transport }
	}

	/// Application identifier.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// Shared transport.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// `/s/{client}` or `/s/{client}/organizations/{org}`.
	pub fn base_path(&self, organization: Option<&OrganizationId>) -> String {
		scoped_path("s", &self.client_id, organization)
	}

	/// `/p/{client}` or `/p/{client}/organizations/{org}` for bearer-authenticated calls.
	pub fn public_path(&self, organization: Option<&OrganizationId>) -> String {
		scoped_path("p", &self.client_id, organization)
	}

	/// Signs `input` and returns the query pairs in wire order.
	pub fn signed_query(&self, input: QueryInput) -> Result<Vec<(String, String)>> {
		Ok(sign::sign_query(input, &self.secret, None)?.to_pairs())
	}

	/// Serializes and signs `payload` as a JSON body.
	pub fn signed_body<B>(&self, payload: &B) -> Result<Value>
	where
		B: ?Sized + Serialize,
	{
		let input = model::to_object(payload)?;

		Ok(sign::sign_body(input, &self.secret, None)?.into_value())
	}

	/// Sends `request` inside a call span, recording attempt and outcome.
	pub async fn send(
		&self,
		resource: Resource,
		operation: &'static str,
		request: TransportRequest,
	) -> Result<RawResponse, TransportError> {
		let span = CallSpan::new(resource, operation);

		obs::record_call_outcome(resource, CallOutcome::Attempt);

		let outcome = span
			.instrument(self.transport.execute(request))
			.await
			.and_then(RawResponse::error_for_status);

		match &outcome {
			Ok(raw) => {
				span.record_status(raw.status);
				obs::record_call_outcome(resource, CallOutcome::Success);
			},
			Err(e) => {
				span.record_failure(e.status(), &e.message());
				obs::record_call_outcome(resource, CallOutcome::Failure);
			},
		}

		outcome
	}
}
impl<T> Clone for Context<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self {
			client_id: self.client_id.clone(),
			secret: self.secret.clone(),
			transport: Arc::clone(&self.transport),
		}
	}
}
impl<T> Debug for Context<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Context")
			.field("client_id", &self.client_id)
			.field("secret", &self.secret)
			.finish_non_exhaustive()
	}
}

/// Standard base64 of `role`, the form role names travel in.
pub fn encode_role(role: &str) -> String {
	STANDARD.encode(role)
}

/// Builds a [`QueryInput`] from borrowed pairs.
pub fn query_input<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> QueryInput {
	pairs.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect()
}

fn scoped_path(
	prefix: &str,
	client_id: &ClientId,
	organization: Option<&OrganizationId>,
) -> String {
	match organization {
		Some(organization) => format!("/{prefix}/{client_id}/organizations/{organization}"),
		None => format!("/{prefix}/{client_id}"),
	}
}
