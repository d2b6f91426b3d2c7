//! Client facade exposing the resource callers over one shared transport.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, ClientSecret, OrganizationId, ValidatedToken},
	envelope::ResponseEnvelope,
	http::{BlobUploader, RestTransport},
	model::HasRole,
	resource::{Apps, Context, Files, Organizations, Users},
};
#[cfg(feature = "reqwest")] use crate::{config::Config, http::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type DefaultClient = Client<ReqwestTransport>;

/// Entry point for platform calls.
///
/// The client owns the application credentials and the transport; resource callers are cheap
/// handles that share both. Nothing else is shared between calls.
pub struct Client<T>
where
	T: ?Sized,
{
	users: Users<T>,
	organizations: Organizations<T>,
	files: Files<T>,
	apps: Apps<T>,
	client_id: ClientId,
}
impl<T> Client<T>
where
	T: ?Sized + RestTransport,
{
	/// Creates a client over a caller-provided transport and blob uploader.
	pub fn with_transport(
		client_id: ClientId,
		client_secret: ClientSecret,
		transport: impl Into<Arc<T>>,
		uploader: Arc<dyn BlobUploader>,
	) -> Self {
		let ctx = Context::new(client_id.clone(), client_secret, transport.into());

		Self {
			users: Users::new(ctx.clone()),
			organizations: Organizations::new(ctx.clone()),
			files: Files::new(ctx.clone(), uploader),
			apps: Apps::new(ctx),
			client_id,
		}
	}

	/// Application identifier.
	pub fn client_id(&self) -> &ClientId {
		&self.client_id
	}

	/// User, role, and token operations.
	pub fn users(&self) -> &Users<T> {
		&self.users
	}

	/// Organization operations.
	pub fn organizations(&self) -> &Organizations<T> {
		&self.organizations
	}

	/// File and blob operations.
	pub fn files(&self) -> &Files<T> {
		&self.files
	}

	/// Application-level operations.
	pub fn apps(&self) -> &Apps<T> {
		&self.apps
	}

	/// Shorthand for [`Users::validate_token`].
	pub async fn validate_token(&self, token: &str) -> Result<ValidatedToken>
	where
		T: 'static,
	{
		self.users.validate_token(token).await
	}

	/// Shorthand for [`Users::has_role_token`].
	pub async fn has_role_token(
		&self,
		token: &str,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> Result<ResponseEnvelope<HasRole>> {
		self.users.has_role_token(token, role, organization).await
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport from `config`.
	pub fn new(config: Config) -> Result<Self> {
		let transport =
			Arc::new(ReqwestTransport::new(config.endpoint().clone(), config.user_agent())?);
		let uploader: Arc<dyn BlobUploader> = transport.clone();

		Ok(Self::with_transport(
			config.client_id().clone(),
			config.client_secret().clone(),
			transport,
			uploader,
		))
	}
}
impl<T> Clone for Client<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self {
			users: self.users.clone(),
			organizations: self.organizations.clone(),
			files: self.files.clone(),
			apps: self.apps.clone(),
			client_id: self.client_id.clone(),
		}
	}
}
impl<T> Debug for Client<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("client_id", &self.client_id).finish_non_exhaustive()
	}
}
