//! axum middleware built on [`AuthGuard`].
//!
//! ```ignore
//! let guard = AuthGuard::new(client);
//! let app = Router::new()
//! 	.route("/admin", get(admin))
//! 	.layer(from_fn_with_state(RoleGate::new(guard.clone(), "admin"), has_role))
//! 	.layer(from_fn_with_state(guard, parse_auth_token));
//! ```

// crates.io
use axum::{
	Json,
	extract::{Request, State},
	http::{HeaderMap, StatusCode, header::AUTHORIZATION},
	middleware::Next,
	response::{IntoResponse, Response},
};
// self
use crate::{
	_prelude::*,
	auth::OrganizationId,
	http::RestTransport,
	middleware::{AuthContext, AuthGuard, RoleDecision},
};

/// State for [`has_role`]: the guard plus the role it enforces.
pub struct RoleGate<T>
where
	T: ?Sized,
{
	guard: AuthGuard<T>,
	role: Arc<str>,
	organization: Option<OrganizationId>,
}
impl<T> RoleGate<T>
where
	T: ?Sized,
{
	/// Gate requiring `role` at the application level.
	pub fn new(guard: AuthGuard<T>, role: impl Into<Arc<str>>) -> Self {
		Self { guard, role: role.into(), organization: None }
	}

	/// Checks the role within `organization` instead.
	pub fn in_organization(mut self, organization: OrganizationId) -> Self {
		self.organization = Some(organization);

		self
	}

	/// Role this gate enforces.
	pub fn role(&self) -> &str {
		&self.role
	}
}
impl<T> Clone for RoleGate<T>
where
	T: ?Sized,
{
	fn clone(&self) -> Self {
		Self {
			guard: self.guard.clone(),
			role: Arc::clone(&self.role),
			organization: self.organization.clone(),
		}
	}
}
impl<T> Debug for RoleGate<T>
where
	T: ?Sized,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RoleGate")
			.field("role", &self.role)
			.field("organization", &self.organization)
			.finish_non_exhaustive()
	}
}

/// Attaches an [`AuthContext`] to the request extensions; never rejects.
pub async fn parse_auth_token<T>(
	State(guard): State<AuthGuard<T>>,
	mut request: Request,
	next: Next,
) -> Response
where
	T: 'static + ?Sized + RestTransport,
{
	let header = authorization(request.headers());
	let context: AuthContext = guard.authenticate(header.as_deref()).await;

	request.extensions_mut().insert(context);

	next.run(request).await
}

/// Rejects callers lacking the gate's role with `403 {"error": "User does not meet role <role>"}`.
pub async fn has_role<T>(State(gate): State<RoleGate<T>>, request: Request, next: Next) -> Response
where
	T: 'static + ?Sized + RestTransport,
{
	let header = authorization(request.headers());

	match gate.guard.check_role(header.as_deref(), &gate.role, gate.organization.as_ref()).await {
		RoleDecision::Allow => next.run(request).await,
		RoleDecision::Deny { status, body } =>
			(StatusCode::from_u16(status).unwrap_or(StatusCode::FORBIDDEN), Json(body))
				.into_response(),
	}
}

fn authorization(headers: &HeaderMap) -> Option<String> {
	headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).map(str::to_owned)
}
