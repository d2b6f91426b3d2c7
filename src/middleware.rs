//! Framework-agnostic authentication and role gating.
//!
//! [`AuthGuard`] wraps a [`Client`] and answers the two questions web middleware asks:
//! who is calling ([`AuthGuard::authenticate`]) and whether they hold a role
//! ([`AuthGuard::check_role`]). Authentication never fails the request; any problem yields an
//! unauthenticated [`AuthContext`]. Role checks deny on any failure to confirm the role.
//!
//! The `axum` feature adds ready-made middleware functions in `middleware::axum`.

#[cfg(feature = "axum")] pub mod axum;

// self
use crate::{
	_prelude::*,
	auth::{OrganizationId, ValidatedToken, WalletResolver},
	client::Client,
	http::RestTransport,
};

/// Status returned when a caller lacks the required role.
pub const ROLE_DENIED_STATUS: u16 = 403;

/// Extracts the token from an `Authorization` header of the form `Bearer <token>`.
///
/// The scheme is matched case-insensitively and the header must contain exactly two
/// whitespace-separated parts.
pub fn parse_bearer(header: &str) -> Result<&str> {
	let mut parts = header.split_whitespace();

	match (parts.next(), parts.next(), parts.next()) {
		(Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
		_ => Err(Error::MalformedAuthHeader),
	}
}

/// Request-scoped identity attached by authentication middleware.
#[derive(Clone, Debug, Default)]
pub struct AuthContext {
	/// Wallet address, when the token subject is one.
	pub wallet: Option<String>,
	/// User handle, when the token subject is one.
	pub user_id: Option<String>,
	/// Whether the platform confirmed the token.
	pub is_authed: bool,
	/// Application the token was issued for.
	pub client_id: Option<String>,
	resolver: Option<WalletResolver>,
}
impl AuthContext {
	/// Context for a request without a valid token.
	pub fn unauthenticated() -> Self {
		Self::default()
	}

	/// Context for a confirmed token.
	pub fn from_token(token: &ValidatedToken) -> Self {
		Self {
			wallet: token.wallet.clone(),
			user_id: token.user_id.clone(),
			is_authed: true,
			client_id: Some(token.client_id().to_owned()),
			resolver: Some(token.wallet_resolver()),
		}
	}

	/// Resolves the caller's wallet address; `Ok(None)` for unauthenticated requests.
	pub async fn wallet_address(&self) -> Result<Option<String>> {
		match &self.resolver {
			Some(resolver) => resolver.resolve().await,
			None => Ok(None),
		}
	}
}

/// Outcome of a role gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleDecision {
	/// Continue to the downstream handler.
	Allow,
	/// Reject with `status` and the JSON `body`.
	Deny {
		/// HTTP status to respond with.
		status: u16,
		/// JSON response body.
		body: Value,
	},
}
impl RoleDecision {
	/// Rejection for a caller lacking `role`.
	pub fn deny(role: &str) -> Self {
		Self::Deny {
			status: ROLE_DENIED_STATUS,
			body: serde_json::json!({ "error": format!("User does not meet role {role}") }),
		}
	}

	/// Returns `true` for [`RoleDecision::Allow`].
	pub fn is_allowed(&self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// Token validation and role checks for incoming requests.
pub struct AuthGuard<T>
where
	T: ?Sized,
{
	client: Client<T>,
}
impl<T> AuthGuard<T>
where
	T: 'static + ?Sized + RestTransport,
{
	/// Creates a guard backed by `client`.
	pub fn new(client: Client<T>) -> Self {
		Self { client }
	}

	/// Underlying client.
	pub fn client(&self) -> &Client<T> {
		&self.client
	}

	/// Validates the bearer token in `header`, falling back to an unauthenticated context.
	pub async fn authenticate(&self, header: Option<&str>) -> AuthContext {
		match self.try_authenticate(header).await {
			Ok(context) => context,
			Err(_) => AuthContext::unauthenticated(),
		}
	}

	/// Like [`authenticate`](Self::authenticate) but surfaces the failure.
	pub async fn try_authenticate(&self, header: Option<&str>) -> Result<AuthContext> {
		let token = parse_bearer(header.unwrap_or_default())?;
		let validated = self.client.validate_token(token).await?;

		Ok(AuthContext::from_token(&validated))
	}

	/// Checks that the bearer of `header` holds `role`.
	///
	/// A missing or malformed header, a transport failure, or a negative answer all deny.
	pub async fn check_role(
		&self,
		header: Option<&str>,
		role: &str,
		organization: Option<&OrganizationId>,
	) -> RoleDecision {
		let Ok(token) = parse_bearer(header.unwrap_or_default()) else {
			return RoleDecision::deny(role);
		};

		match self.client.has_role_token(token, role, organization).await {
			Ok(envelope) if envelope.data().is_some_and(|answer| answer.has_role) =>
				RoleDecision::Allow,
			_ => RoleDecision::deny(role),
		}
	}
}
impl<T> Clone for AuthGuard<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self { client: self.client.clone() }
	}
}
impl<T> Debug for AuthGuard<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthGuard").field("client", &self.client).finish()
	}
}
