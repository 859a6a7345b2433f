//! Walks a full Nextcloud login against a mocked server: build the authorization redirect,
//! exchange the returned code, then read the OCS user profile.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use nextcloud_oauth2::{
	flows::ProviderClient,
	provider::{Nextcloud, ProviderConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/apps/oauth2/api/v1/token");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"demo-access","token_type":"bearer","expires_in":3600,"refresh_token":"demo-refresh","user_id":"ann"}"#,
			);
		})
		.await;
	let user_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/ocs/v2.php/cloud/user").header("ocs-apirequest", "true");
			then.status(200).header("content-type", "application/json").body(
				r#"{"ocs":{"meta":{"status":"ok","statuscode":200},"data":{"id":"ann","display-name":"Ann","email":"ann@example.com","groups":["admin"]}}}"#,
			);
		})
		.await;
	let config = ProviderConfig::builder(server.base_url())
		.client_id("demo-client")
		.client_secret("demo-secret")
		.redirect_uri("https://app.example.com/callback")
		.build()?;
	let client = ProviderClient::new(Nextcloud::new(config))?;
	let session = client.authorize();

	println!("Redirect the user to: {}", session.url);

	// The callback would echo `state` back alongside the authorization code.
	session.validate_state(&session.state)?;

	let token = client.exchange_code("demo-code").await?;

	token_mock.assert_async().await;

	println!("Issued token: {token:?}");

	let owner = client.fetch_resource_owner(&token).await?;

	user_mock.assert_async().await;

	println!(
		"Signed in as {} <{}>, groups {:?}",
		owner.name().unwrap_or("unknown"),
		owner.email().unwrap_or("unknown"),
		owner.groups().unwrap_or_default()
	);
	println!("Profile: {}", serde_json::to_string_pretty(&owner)?);

	Ok(())
}
