#![cfg(feature = "reqwest")]

// std
use std::collections::HashMap;
// crates.io
use httpmock::prelude::*;
// self
use nextcloud_oauth2::{
	auth::{AccessToken, TokenSecret},
	error::{Error, ResponseError},
	flows::ProviderClient,
	provider::{Nextcloud, ProviderConfig, UserInfoSchema},
};

const CLIENT_ID: &str = "mock_client_id";
const CLIENT_SECRET: &str = "mock_secret";
const REDIRECT_URI: &str = "https://app.example.com/callback";
const TOKEN_PATH: &str = "/apps/oauth2/api/v1/token";

fn build_client(server: &MockServer, schema: UserInfoSchema) -> ProviderClient<Nextcloud> {
	let config = ProviderConfig::builder(server.base_url())
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.redirect_uri(REDIRECT_URI)
		.build()
		.expect("Mock server configuration should build.");

	ProviderClient::new(Nextcloud::new(config).with_schema(schema))
		.expect("Provider client should build.")
}

#[tokio::test]
async fn authorization_url_points_at_the_server() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Ocs);
	let session = client.authorize();
	let pairs: HashMap<_, _> = session.url.query_pairs().into_owned().collect();

	assert!(session.url.as_str().starts_with(&server.url("/apps/oauth2/authorize")));
	assert_eq!(pairs.get("client_id"), Some(&CLIENT_ID.into()));
	assert_eq!(pairs.get("redirect_uri"), Some(&REDIRECT_URI.into()));
	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("approval_prompt"), Some(&"auto".into()));
	assert_eq!(pairs.get("scope"), Some(&String::new()));
	assert_eq!(pairs.get("state"), Some(&session.state));
	assert!(!session.state.is_empty());
	assert!(session.validate_state(&session.state).is_ok());
}

#[tokio::test]
async fn exchange_code_returns_the_issued_token() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Ocs);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TOKEN_PATH)
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"mock_access_token","token_type":"bearer","expires_in":3600,"refresh_token":"mock_refresh_token","user_id":"admin"}"#,
			);
		})
		.await;
	let token = client
		.exchange_code("mock_authorization_code")
		.await
		.expect("Authorization code exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token.expose(), "mock_access_token");
	assert_eq!(token.token_type, "bearer");
	assert_eq!(token.refresh_token.as_ref().map(TokenSecret::expose), Some("mock_refresh_token"));
	assert_eq!(token.resource_owner_id.as_deref(), Some("admin"));
	assert!(token.expires_at.is_some());
	assert!(!token.is_expired());
}

#[tokio::test]
async fn exchange_code_surfaces_provider_errors() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Ocs);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"error":"invalid_request"}"#);
		})
		.await;
	let err = client
		.exchange_code("expired-code")
		.await
		.expect_err("Error bodies must fail the exchange.");

	mock.assert_async().await;

	match err {
		Error::Provider(err) => assert_eq!((err.message.as_str(), err.code), ("invalid_request", 0)),
		other => panic!("Expected a provider error, got {other:?}."),
	}
}

#[tokio::test]
async fn error_bodies_fail_even_with_a_success_status() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Ocs);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"error":{"message":"boom","code":42}}"#);
		})
		.await;
	let err = client
		.exchange_code("mock_authorization_code")
		.await
		.expect_err("Structured error bodies must fail the exchange.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Provider(ref err) if err.code == 42 && err.message == "boom"));
}

#[tokio::test]
async fn refresh_keeps_the_redeemed_token_when_not_rotated() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Ocs);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"fresh_access_token","token_type":"bearer"}"#);
		})
		.await;
	let refresh = TokenSecret::new("mock_refresh_token");
	let token = client.refresh_token(&refresh).await.expect("Refresh should succeed.");

	mock.assert_async().await;

	assert_eq!(token.access_token.expose(), "fresh_access_token");
	assert_eq!(token.refresh_token, Some(refresh));
	assert_eq!(token.expires_at, None);
}

#[tokio::test]
async fn fetch_resource_owner_reads_the_ocs_profile() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Ocs);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/ocs/v2.php/cloud/user")
				.query_param("format", "json")
				.header("authorization", "Bearer mock_access_token")
				.header("ocs-apirequest", "true");
			then.status(200).header("content-type", "application/json").body(
				r#"{"ocs":{"meta":{"status":"ok"},"data":{"id":"ann","display-name":"Ann","email":"a@x.com","groups":["admin","staff"]}}}"#,
			);
		})
		.await;
	let owner = client
		.fetch_resource_owner(&AccessToken::new("mock_access_token", "bearer"))
		.await
		.expect("Resource owner fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(owner.id().as_deref(), Some("ann"));
	assert_eq!(owner.name(), Some("Ann"));
	assert_eq!(owner.email(), Some("a@x.com"));
	assert_eq!(owner.groups(), Some(vec!["admin".to_owned(), "staff".to_owned()]));
	assert_eq!(owner.to_map().len(), 4);
}

#[tokio::test]
async fn fetch_resource_owner_reads_the_whoami_profile() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Oidc);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/oauth2/user/whoami")
				.header("authorization", "Bearer mock_access_token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"sub":"ann","name":"Ann","email":"a@x.com"}"#);
		})
		.await;
	let owner = client
		.fetch_resource_owner(&AccessToken::new("mock_access_token", "bearer"))
		.await
		.expect("Resource owner fetch should succeed.");

	mock.assert_async().await;

	assert_eq!(owner.id().as_deref(), Some("ann"));
	assert_eq!(owner.to_map().len(), 3);
}

#[tokio::test]
async fn fetch_resource_owner_rejects_failures() {
	let server = MockServer::start_async().await;
	let client = build_client(&server, UserInfoSchema::Oidc);
	let token = AccessToken::new("mock_access_token", "bearer");
	let mut mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/oauth2/user/whoami");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"error":"user disabled"}"#);
		})
		.await;
	let err = client
		.fetch_resource_owner(&token)
		.await
		.expect_err("Error bodies must fail the fetch.");

	assert!(matches!(err, Error::Provider(ref err) if err.message == "user disabled"));

	mock.delete_async().await;
	mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/oauth2/user/whoami");
			then.status(401).body("Unauthorized");
		})
		.await;

	let err = client
		.fetch_resource_owner(&token)
		.await
		.expect_err("Non-success statuses must fail the fetch.");

	mock.assert_async().await;

	assert!(matches!(
		err,
		Error::Response(ResponseError::Unexpected { status: Some(401), .. })
	));
}
