//! Organizations and their token-gated role requirements.

// self
use crate::{
	_prelude::*,
	auth::{OrganizationId, ResourceId},
	envelope::{self, ResponseEnvelope},
	http::{Method, RestTransport, TransportRequest},
	model::{NewRoleRequirement, Organization, RoleRequirement, UpdateOrganization},
	obs::Resource,
	resource::{Context, query_input},
};

const RESOURCE: Resource = Resource::Organizations;

/// Caller for organization operations.
pub struct Organizations<T>
where
	T: ?Sized,
{
	ctx: Context<T>,
}
impl<T> Organizations<T>
where
	T: ?Sized + RestTransport,
{
	/// Creates a caller over a shared context.
	pub fn new(ctx: Context<T>) -> Self {
		Self { ctx }
	}

	/// Creates an organization; a missing description is sent as the empty string.
	pub async fn create(
		&self,
		name: &str,
		description: Option<&str>,
	) -> Result<ResponseEnvelope<Organization>> {
		let body = serde_json::json!({ "name": name, "description": description.unwrap_or_default() });
		let request = TransportRequest::new(
			Method::Post,
			format!("{}/organizations", self.ctx.base_path(None)),
		)
		.with_body(self.ctx.signed_body(&body)?);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "create_organization", request).await))
	}

	/// Replaces an organization's name and description.
	pub async fn update(
		&self,
		organization: &OrganizationId,
		update: &UpdateOrganization,
	) -> Result<ResponseEnvelope<Organization>> {
		let request = TransportRequest::new(Method::Put, self.ctx.base_path(Some(organization)))
			.with_body(self.ctx.signed_body(update)?);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "update_organization", request).await))
	}

	/// Adds an on-chain role requirement.
	pub async fn add_role_requirement(
		&self,
		organization: &OrganizationId,
		requirement: &NewRoleRequirement,
	) -> Result<ResponseEnvelope<RoleRequirement>> {
		let request = TransportRequest::new(
			Method::Post,
			format!("{}/role_requirement", self.ctx.base_path(Some(organization))),
		)
		.with_body(self.ctx.signed_body(requirement)?);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "add_role_requirement", request).await))
	}

	/// Deletes the role requirement `role_id`.
	pub async fn delete_role_requirement(
		&self,
		organization: &OrganizationId,
		role_id: &ResourceId,
	) -> Result<ResponseEnvelope<RoleRequirement>> {
		let request = TransportRequest::new(
			Method::Delete,
			format!("{}/role_requirement", self.ctx.base_path(Some(organization))),
		)
		.with_query(self.ctx.signed_query(query_input([("roleID", role_id.as_ref())]))?);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "delete_role_requirement", request).await))
	}
}
impl<T> Clone for Organizations<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self { ctx: self.ctx.clone() }
	}
}
impl<T> Debug for Organizations<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Organizations").field("ctx", &self.ctx).finish()
	}
}
