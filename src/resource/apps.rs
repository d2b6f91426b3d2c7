//! Application info and role-restricted metadata.

// self
use crate::{
	_prelude::*,
	envelope::{self, ResponseEnvelope},
	http::{Method, RestTransport, TransportRequest},
	model::{App, Metadata},
	obs::Resource,
	resource::{Context, encode_role, query_input},
};

const RESOURCE: Resource = Resource::Apps;

/// Caller for application-level operations.
pub struct Apps<T>
where
	T: ?Sized,
{
	ctx: Context<T>,
}
impl<T> Apps<T>
where
	T: ?Sized + RestTransport,
{
	/// Creates a caller over a shared context.
	pub fn new(ctx: Context<T>) -> Self {
		Self { ctx }
	}

	/// Fetches the application's public info. The request is not signed.
	pub async fn get_info(&self) -> Result<ResponseEnvelope<App>> {
		let request = TransportRequest::new(Method::Get, self.ctx.base_path(None));

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "get_info", request).await))
	}

	/// Fetches the metadata only holders of `role` may read.
	pub async fn get_role_restricted_data(&self, role: &str) -> Result<ResponseEnvelope<Metadata>> {
		let encoded = encode_role(role);
		let query =
			self.ctx.signed_query(query_input([("role", encoded.as_str()), ("encoded", "true")]))?;
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/role_metadata", self.ctx.base_path(None)),
		)
		.with_query(query);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "get_role_restricted_data", request).await))
	}

	/// Replaces the metadata attached to `role`.
	pub async fn update_role_restricted_data(
		&self,
		role: &str,
		metadata: &Metadata,
	) -> Result<ResponseEnvelope<Metadata>> {
		let body = serde_json::json!({ "role": role, "metadata": metadata });
		let request = TransportRequest::new(
			Method::Put,
			format!("{}/role_metadata", self.ctx.base_path(None)),
		)
		.with_body(self.ctx.signed_body(&body)?);

		Ok(envelope::normalize_data(
			self.ctx.send(RESOURCE, "update_role_restricted_data", request).await,
		))
	}
}
impl<T> Clone for Apps<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self { ctx: self.ctx.clone() }
	}
}
impl<T> Debug for Apps<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Apps").field("ctx", &self.ctx).finish()
	}
}
