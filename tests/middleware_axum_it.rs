#![cfg(feature = "axum")]

// crates.io
use axum::{
	Extension, Router,
	body::{Body, to_bytes},
	http::{Request, StatusCode},
	middleware::from_fn_with_state,
	response::Response,
	routing::get,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use httpmock::prelude::*;
use tower::ServiceExt;
// self
use slashauth::{
	Client, Config,
	auth::ClientId,
	http::ReqwestTransport,
	middleware::{
		AuthContext, AuthGuard,
		axum::{RoleGate, has_role, parse_auth_token},
	},
};

const CLIENT_ID: &str = "app";

fn build_guard(server: &MockServer) -> AuthGuard<ReqwestTransport> {
	let client_id = ClientId::new(CLIENT_ID).expect("Client identifier should be valid.");
	let config = Config::builder(client_id, "secret-axum")
		.endpoint(server.base_url())
		.build()
		.expect("Loopback configuration should validate.");

	AuthGuard::new(Client::new(config).expect("Client should build against the mock server."))
}

fn token_for(subject: &str) -> String {
	let claims = serde_json::json!({ "sub": subject, "client_id": CLIENT_ID });

	format!("h.{}.s", STANDARD.encode(claims.to_string()))
}

async fn whoami(Extension(context): Extension<AuthContext>) -> String {
	format!("{}:{}", context.is_authed, context.wallet.unwrap_or_default())
}

fn request(authorization: Option<&str>) -> Request<Body> {
	let mut builder = Request::builder().uri("/route");

	if let Some(value) = authorization {
		builder = builder.header("authorization", value);
	}

	builder.body(Body::empty()).expect("Test request should build.")
}

async fn body_text(response: Response) -> String {
	let bytes =
		to_bytes(response.into_body(), usize::MAX).await.expect("Response body should be readable.");

	String::from_utf8(bytes.to_vec()).expect("Response body should be UTF-8.")
}

#[tokio::test]
async fn parse_auth_token_attaches_context() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(200);
		})
		.await;
	let app = Router::new()
		.route("/route", get(whoami))
		.layer(from_fn_with_state(build_guard(&server), parse_auth_token::<ReqwestTransport>));
	let authorization = format!("Bearer {}", token_for("0xWallet"));
	let response =
		app.oneshot(request(Some(&authorization))).await.expect("Router should not fail.");

	mock.assert_async().await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_text(response).await, "true:0xWallet");
}

#[tokio::test]
async fn parse_auth_token_passes_anonymous_requests_through() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(401);
		})
		.await;
	let app = Router::new()
		.route("/route", get(whoami))
		.layer(from_fn_with_state(build_guard(&server), parse_auth_token::<ReqwestTransport>));
	let anonymous =
		app.clone().oneshot(request(None)).await.expect("Router should not fail.");
	let malformed =
		app.clone().oneshot(request(Some("Token abc"))).await.expect("Router should not fail.");
	let rejected = app
		.oneshot(request(Some(&format!("Bearer {}", token_for("0xWallet")))))
		.await
		.expect("Router should not fail.");

	mock.assert_calls_async(1).await;

	for response in [anonymous, malformed, rejected] {
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(body_text(response).await, "false:");
	}
}

#[tokio::test]
async fn has_role_rejects_callers_without_the_role() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/p/app/has_role").header("authorization", "Bearer tok");
			then.status(200).header("content-type", "application/json").body("{\"hasRole\":false}");
		})
		.await;
	let gate = RoleGate::new(build_guard(&server), "admin");
	let app = Router::new()
		.route("/route", get(|| async { "secret" }))
		.layer(from_fn_with_state(gate, has_role::<ReqwestTransport>));
	let response = app.oneshot(request(Some("Bearer tok"))).await.expect("Router should not fail.");

	mock.assert_async().await;

	assert_eq!(response.status(), StatusCode::FORBIDDEN);

	let body: serde_json::Value = serde_json::from_str(&body_text(response).await)
		.expect("Rejection body should be JSON.");

	assert_eq!(body, serde_json::json!({ "error": "User does not meet role admin" }));
}

#[tokio::test]
async fn has_role_admits_role_holders() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/p/app/has_role").query_param("role", "ZWRpdG9y");
			then.status(200).header("content-type", "application/json").body("{\"hasRole\":true}");
		})
		.await;
	let gate = RoleGate::new(build_guard(&server), "editor");
	let app = Router::new()
		.route("/route", get(|| async { "secret" }))
		.layer(from_fn_with_state(gate, has_role::<ReqwestTransport>));
	let response = app.oneshot(request(Some("Bearer tok"))).await.expect("Router should not fail.");

	mock.assert_async().await;

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_text(response).await, "secret");
}
