//! Users, role checks, and token validation.

// self
use crate::{
	_prelude::*,
	auth::{
		LookupFuture, OrganizationId, UserId, UserLookup, ValidatedToken, claims_segment,
		decode_claims,
	},
	envelope::{self, Page, ResponseEnvelope},
	error::TransportError,
	http::{Method, RestTransport, TransportRequest, bearer},
	model::{AssignedRole, CreateUser, HasRole, OrgMembership, UpdateUserMetadata, UserRecord},
	obs::Resource,
	resource::{Context, encode_role, query_input},
};

const RESOURCE: Resource = Resource::Users;

/// Caller for user, role, and token operations.
pub struct Users<T>
where
	T: ?Sized,
{
	ctx: Context<T>,
}
impl<T> Users<T>
where
	T: ?Sized + RestTransport,
{
	/// Creates a caller over a shared context.
	pub fn new(ctx: Context<T>) -> Self {
		Self { ctx }
	}

	/// Confirms `token` with the platform and decodes its claims.
	///
	/// A token without a claims segment fails with [`Error::MalformedToken`] before any request
	/// is sent. A `200` confirms the token whatever its body; any other status yields
	/// [`Error::InvalidToken`] and a network failure is returned as [`Error::Transport`].
	pub async fn validate_token(&self, token: &str) -> Result<ValidatedToken>
	where
		T: 'static,
	{
		claims_segment(token)?;

		let request = TransportRequest::new(Method::Get, "/validate_token").with_query(vec![
			("client_id".into(), self.ctx.client_id().to_string()),
			("token".into(), token.to_owned()),
		]);

		// Only the status decides; the confirmation body is never read.
		match self.ctx.send(RESOURCE, "validate_token", request).await {
			Ok(raw) if raw.status == 200 => {},
			Err(TransportError::Decode { status: 200, .. }) => {},
			Ok(raw) => return Err(Error::InvalidToken { status: Some(raw.status) }),
			Err(TransportError::Status { status, .. } | TransportError::Decode { status, .. }) =>
				return Err(Error::InvalidToken { status: Some(status) }),
			Err(e) => return Err(e.into()),
		}

		let claims = decode_claims(token)?;

		Ok(ValidatedToken::from_claims(claims, Arc::new(self.clone())))
	}

	/// Checks whether `user_id` holds `role`.
	pub async fn has_role(
		&self,
		user_id: &UserId,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<HasRole>> {
		self.role_check("userID", user_id, role, organization).await
	}

	/// Checks whether the wallet `address` holds `role`.
	pub async fn has_role_wallet(
		&self,
		address: &str,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<HasRole>> {
		self.role_check("address", address, role, organization).await
	}

	/// Checks whether the bearer of `token` holds `role`; the request is not secret-signed.
	pub async fn has_role_token(
		&self,
		token: &str,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<HasRole>> {
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/has_role", self.ctx.public_path(organization)),
		)
		.with_query(vec![("role".into(), encode_role(role)), ("encoded".into(), "true".into())])
		.with_header("Authorization", bearer(token));

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "has_role_token", request).await))
	}

	/// Lists the organizations `user_id` belongs to.
	pub async fn get_org_memberships(
		&self,
		user_id: &UserId,
	) -> Result<ResponseEnvelope<Vec<OrgMembership>>> {
		let query = self.ctx.signed_query(query_input([("userID", user_id.as_ref())]))?;
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/org_memberships", self.ctx.base_path(None)),
		)
		.with_query(query);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "get_org_memberships", request).await))
	}

	/// Fetches one user.
	pub async fn get_user_by_id(
		&self,
		user_id: &UserId,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<UserRecord>> {
		let query = self
			.ctx
			.signed_query(query_input(organization.map(|org| ("organizationID", org.as_ref()))))?;
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/users/{user_id}", self.ctx.base_path(organization)),
		)
		.with_query(query);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "get_user_by_id", request).await))
	}

	/// Lists users one page at a time.
	pub async fn get_users(
		&self,
		organization: Option<&OrganizationId>,
		cursor: Option<&str>,
	) -> Result<ResponseEnvelope<Page<UserRecord>>> {
		let input = query_input(
			organization
				.map(|org| ("organizationID", org.as_ref()))
				.into_iter()
				.chain(cursor.map(|cursor| ("cursor", cursor))),
		);
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/users", self.ctx.base_path(organization)),
		)
		.with_query(self.ctx.signed_query(input)?);

		Ok(envelope::normalize_page(self.ctx.send(RESOURCE, "get_users", request).await))
	}

	/// Creates a user.
	pub async fn create_user(&self, user: &CreateUser) -> Result<ResponseEnvelope<UserRecord>> {
		let request =
			TransportRequest::new(Method::Post, format!("{}/users", self.ctx.base_path(None)))
				.with_body(self.ctx.signed_body(user)?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "create_user", request).await))
	}

	/// Replaces a user's nickname and metadata.
	pub async fn update_user_metadata(
		&self,
		user_id: &UserId,
		update: &UpdateUserMetadata,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<UserRecord>> {
		let request = TransportRequest::new(
			Method::Put,
			format!("{}/users/{user_id}", self.ctx.base_path(organization)),
		)
		.with_body(self.ctx.signed_body(update)?);

		Ok(envelope::normalize_data(self.ctx.send(RESOURCE, "update_user_metadata", request).await))
	}

	/// Assigns `role` to `user_id`.
	pub async fn add_assigned_role(
		&self,
		user_id: &UserId,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<AssignedRole>> {
		let request = TransportRequest::new(
			Method::Post,
			format!("{}/users/{user_id}/assigned_role", self.ctx.base_path(organization)),
		)
		.with_body(self.ctx.signed_body(&serde_json::json!({ "role": role }))?);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "add_assigned_role", request).await))
	}

	/// Removes an assigned `role` from `user_id`.
	///
	/// The role travels base64-encoded; unlike the role checks no `encoded` flag is sent.
	pub async fn remove_assigned_role(
		&self,
		user_id: &UserId,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<AssignedRole>> {
		let encoded = encode_role(role);
		let request = TransportRequest::new(
			Method::Delete,
			format!("{}/users/{user_id}/assigned_role", self.ctx.base_path(organization)),
		)
		.with_query(self.ctx.signed_query(query_input([("role", encoded.as_str())]))?);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "remove_assigned_role", request).await))
	}

	async fn role_check(
		&self,
		subject_key: &'static str,
		subject: &str,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<HasRole>> {
		let encoded = encode_role(role);
		let query = self.ctx.signed_query(query_input([
			(subject_key, subject),
			("role", encoded.as_str()),
			("encoded", "true"),
		]))?;
		let request = TransportRequest::new(
			Method::Get,
			format!("{}/has_role", self.ctx.base_path(organization)),
		)
		.with_query(query);

		Ok(envelope::normalize(self.ctx.send(RESOURCE, "has_role", request).await))
	}
}
impl<T> Clone for Users<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self { ctx: self.ctx.clone() }
	}
}
impl<T> Debug for Users<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Users").field("ctx", &self.ctx).finish()
	}
}
impl<T> UserLookup for Users<T>
where
	T: ?Sized + RestTransport,
{
	fn wallet_for_user<'a>(&'a self, user_id: &'a str) -> LookupFuture<'a> {
		Box::pin(async move {
			let id = UserId::new(user_id)?;
			let user = self.get_user_by_id(&id, None).await?.into_result().map_err(|reason| {
				Error::WalletLookup { user_id: user_id.to_owned(), reason }
			})?;

			Ok(user.and_then(|user| user.wallet).filter(|wallet| !wallet.is_empty()))
		})
	}
}
