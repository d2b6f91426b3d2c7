// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use httpmock::prelude::*;
// self
use slashauth::{
	Client, Config,
	auth::{ClientId, UserId},
	client::DefaultClient,
	error::Error,
	model::CreateUser,
};

const CLIENT_ID: &str = "app";
const CLIENT_SECRET: &str = "secret-users";

fn build_client(server: &MockServer) -> DefaultClient {
	let client_id = ClientId::new(CLIENT_ID).expect("Client identifier should be valid.");
	let config = Config::builder(client_id, CLIENT_SECRET)
		.endpoint(server.base_url())
		.version("test")
		.build()
		.expect("Loopback configuration should validate.");

	Client::new(config).expect("Client should build against the mock server.")
}

fn token_for(subject: &str) -> String {
	let claims = serde_json::json!({
		"iss": "slashauth",
		"sub": subject,
		"client_id": CLIENT_ID,
		"iat": 1_700_000_000,
		"exp": 1_700_003_600,
	});

	format!("eyJhbGciOiJIUzI1NiJ9.{}.signature", STANDARD.encode(claims.to_string()))
}

fn user_id(value: &str) -> UserId {
	UserId::new(value).expect("User identifier fixture should be valid.")
}

#[tokio::test]
async fn validate_token_decodes_claims_after_confirmation() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let token = token_for("0xWallet");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/validate_token")
				.query_param("client_id", CLIENT_ID)
				.query_param("token", &token)
				.header("user-agent", "rust-client_test");
			then.status(200);
		})
		.await;
	let validated = client.validate_token(&token).await?;

	mock.assert_async().await;

	assert_eq!(validated.wallet.as_deref(), Some("0xWallet"));
	assert_eq!(validated.user_id, None);
	assert_eq!(validated.client_id(), CLIENT_ID);
	assert_eq!(validated.claims.issuer, "slashauth");
	assert_eq!(validated.wallet_address().await?.as_deref(), Some("0xWallet"));

	Ok(())
}

#[tokio::test]
async fn validate_token_rejection_maps_to_invalid_token() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"token expired\"}");
		})
		.await;
	let err = client
		.validate_token(&token_for("user.42"))
		.await
		.expect_err("Rejected tokens should not validate.");

	mock.assert_async().await;

	assert!(matches!(err, Error::InvalidToken { status: Some(401) }), "{err:?}");
}

#[tokio::test]
async fn validate_token_ignores_non_json_confirmation_body() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(200).header("content-type", "text/plain").body("OK");
		})
		.await;
	let validated = client
		.validate_token(&token_for("0xWallet"))
		.await
		.expect("A 200 confirms the token regardless of its body.");

	mock.assert_async().await;

	assert_eq!(validated.wallet.as_deref(), Some("0xWallet"));
}

#[tokio::test]
async fn wallet_lookup_failure_is_an_error_not_a_missing_wallet() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _validate = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(200);
		})
		.await;
	let user = server
		.mock_async(|when, then| {
			when.method(GET).path("/s/app/users/user.42");
			then.status(500)
				.header("content-type", "application/json")
				.body("{\"error\":\"db down\"}");
		})
		.await;
	let validated = client
		.validate_token(&token_for("user.42"))
		.await
		.expect("User tokens should validate.");
	let err = validated.wallet_address().await.expect_err("Lookup failures must surface.");

	user.assert_async().await;

	match err {
		Error::WalletLookup { user_id, reason } => {
			assert_eq!(user_id, "user.42");
			assert_eq!(reason, "db down");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}

#[tokio::test]
async fn user_without_wallet_resolves_to_none() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _validate = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(200);
		})
		.await;
	let _user = server
		.mock_async(|when, then| {
			when.method(GET).path("/s/app/users/user.9");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"clientID\":\"app\",\"wallet\":\"\"}}");
		})
		.await;
	let validated = client
		.validate_token(&token_for("user.9"))
		.await
		.expect("User tokens should validate.");

	assert_eq!(validated.wallet_address().await.expect("Lookup should succeed."), None);
}

#[tokio::test]
async fn malformed_token_never_reaches_the_platform() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.path("/validate_token");
			then.status(200);
		})
		.await;

	for token in ["not-a-jwt", "header..signature"] {
		let err = client.validate_token(token).await.expect_err("Malformed tokens must fail.");

		assert!(matches!(err, Error::MalformedToken { .. }), "{err:?}");
	}

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn user_subject_wallet_is_looked_up_on_every_call() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let validate = server
		.mock_async(|when, then| {
			when.method(GET).path("/validate_token");
			then.status(200);
		})
		.await;
	let user = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/s/app/users/user.42")
				.query_param_exists("nonce")
				.query_param_exists("sig");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":{\"clientID\":\"app\",\"wallet\":\"0xabc\",\"roles\":[]}}");
		})
		.await;
	let validated = client
		.validate_token(&token_for("user.42"))
		.await
		.expect("User tokens should validate.");

	validate.assert_async().await;

	assert!(validated.subject_is_user_id());
	assert_eq!(validated.user_id.as_deref(), Some("user.42"));
	assert_eq!(validated.wallet, None);
	for _ in 0..2 {
		let wallet = validated.wallet_address().await.expect("Wallet lookup should succeed.");

		assert_eq!(wallet.as_deref(), Some("0xabc"));
	}

	user.assert_calls_async(2).await;
}

#[tokio::test]
async fn has_role_sends_signed_encoded_query() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/s/app/has_role")
				.query_param("userID", "user.42")
				.query_param("role", "YWRtaW4=")
				.query_param("encoded", "true")
				.query_param_exists("nonce")
				.query_param_exists("sig");
			then.status(200).header("content-type", "application/json").body("{\"hasRole\":true}");
		})
		.await;
	let envelope = client
		.users()
		.has_role(&user_id("user.42"), "admin", None)
		.await
		.expect("Role check should be signed.");

	mock.assert_async().await;

	assert!(envelope.is_success());
	assert_eq!(envelope.status_code(), Some(200));
	assert!(envelope.data().is_some_and(|answer| answer.has_role));
}

#[tokio::test]
async fn has_role_token_forwards_bearer_without_signature() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/p/app/has_role")
				.header("authorization", "Bearer tok")
				.query_param("role", "YWRtaW4=")
				.query_param("encoded", "true");
			then.status(200).header("content-type", "application/json").body("{\"hasRole\":false}");
		})
		.await;
	let envelope = client
		.has_role_token("tok", "admin", None)
		.await
		.expect("Token role checks need no signing.");

	mock.assert_async().await;

	assert_eq!(envelope.data().map(|answer| answer.has_role), Some(false));
}

#[tokio::test]
async fn create_user_signs_the_json_body() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/s/app/users")
				.header("content-type", "application/json")
				.body_includes("\"wallet\":\"0xabc\"")
				.body_includes("\"nonce\":\"")
				.body_includes("\"sig\":\"");
			then.status(201)
				.header("content-type", "application/json")
				.header("x-request-id", "req-7")
				.body("{\"data\":{\"clientID\":\"app\",\"wallet\":\"0xabc\",\"nickname\":\"neo\"}}");
		})
		.await;
	let user = CreateUser {
		wallet: Some("0xabc".into()),
		nickname: Some("neo".into()),
		..Default::default()
	};
	let envelope = client.users().create_user(&user).await.expect("User body should be signed.");

	mock.assert_async().await;

	assert_eq!(envelope.status_code(), Some(201));
	assert_eq!(envelope.headers().get("x-request-id").map(String::as_str), Some("req-7"));

	let record = envelope.into_data().expect("Created user should be returned.");

	assert_eq!(record.wallet.as_deref(), Some("0xabc"));
	assert_eq!(record.nickname.as_deref(), Some("neo"));
}

#[tokio::test]
async fn missing_user_yields_error_envelope() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/s/app/users/ghost");
			then.status(404)
				.header("content-type", "application/json")
				.body("{\"error\":\"not found\"}");
		})
		.await;
	let envelope = client
		.users()
		.get_user_by_id(&user_id("ghost"), None)
		.await
		.expect("Platform failures resolve to an envelope.");

	mock.assert_async().await;

	assert!(!envelope.is_success());
	assert_eq!(envelope.error(), Some("not found"));
	assert_eq!(envelope.status_code(), Some(404));
	assert_eq!(envelope.data(), None);
	assert_eq!(envelope.headers().get("content-type").map(String::as_str), Some("application/json"));
}

#[tokio::test]
async fn user_listing_exposes_page_info() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/s/app/users").query_param("cursor", "c1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":[{\"wallet\":\"0x1\"},{\"wallet\":\"0x2\"}],\"cursor\":\"c2\",\"hasMore\":true}");
		})
		.await;
	let page = client
		.users()
		.get_users(None, Some("c1"))
		.await
		.expect("Listing should be signed.")
		.into_data()
		.expect("Listing should return a page.");

	mock.assert_async().await;

	assert_eq!(page.data.len(), 2);
	assert_eq!(page.page_info.cursor.as_deref(), Some("c2"));
	assert!(page.page_info.has_more);
}
