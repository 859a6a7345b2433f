//! Provider client driving the authorization-code flow over reqwest.
//!
//! [`ProviderClient`] pairs an [`OAuthClient`] with a [`ReqwestHttpClient`] and wraps every call
//! in a [`FlowObserver`]. Adapter validation runs on every body the provider returns, whatever
//! the HTTP status.

// crates.io
use reqwest::{StatusCode, header::ACCEPT};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSecret},
	error::ResponseError,
	http::{self, ReqwestHttpClient},
	oauth::{AuthorizationSession, OAuthClient},
	obs::{FlowKind, FlowObserver, FlowOutcome, record_flow_outcome},
	owner::ResourceOwner,
	provider::ProviderAdapter,
};

const USER_INFO_ENDPOINT: &str = "user_info";

/// Authorization-code client for a single provider adapter.
pub struct ProviderClient<P> {
	oauth: OAuthClient<P>,
	http_client: ReqwestHttpClient,
}
impl<P> ProviderClient<P>
where
	P: ProviderAdapter,
{
	/// Creates a client with a default reqwest transport that never follows redirects.
	pub fn new(adapter: impl Into<Arc<P>>) -> Result<Self> {
		Self::with_http_client(adapter, ReqwestHttpClient::new()?)
	}

	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		adapter: impl Into<Arc<P>>,
		http_client: ReqwestHttpClient,
	) -> Result<Self> {
		Ok(Self { oauth: OAuthClient::new(adapter)?, http_client })
	}

	/// Adapter this client drives.
	pub fn adapter(&self) -> &P {
		self.oauth.adapter()
	}

	/// Underlying `oauth2` facade.
	pub fn oauth(&self) -> &OAuthClient<P> {
		&self.oauth
	}

	/// Builds an authorization redirect requesting the adapter's default scopes.
	pub fn authorize(&self) -> AuthorizationSession {
		self.authorize_with_scopes(self.adapter().default_scopes())
	}

	/// Builds an authorization redirect requesting `scopes`.
	pub fn authorize_with_scopes<S>(&self, scopes: &[S]) -> AuthorizationSession
	where
		S: AsRef<str>,
	{
		let observer = FlowObserver::start(self.adapter().id(), FlowKind::Authorize, "authorize");
		let session = {
			let _guard = observer.enter();

			self.oauth.authorize_with_scopes(scopes)
		};

		record_flow_outcome(observer.kind(), FlowOutcome::Success);

		session
	}

	/// Exchanges the authorization code returned on the redirect for an access token.
	pub async fn exchange_code(&self, code: impl Into<String>) -> Result<AccessToken> {
		let observer =
			FlowObserver::start(self.adapter().id(), FlowKind::CodeExchange, "exchange_code");
		let result =
			observer.instrument(self.oauth.exchange_code(&self.http_client, code.into())).await;

		observer.finish(&result);

		result
	}

	/// Redeems a refresh token for a new access token.
	pub async fn refresh_token(&self, refresh_token: &TokenSecret) -> Result<AccessToken> {
		let observer = FlowObserver::start(self.adapter().id(), FlowKind::Refresh, "refresh_token");
		let result = observer.instrument(self.oauth.refresh(&self.http_client, refresh_token)).await;

		observer.finish(&result);

		result
	}

	/// Fetches and wraps the profile of the user who granted `token`.
	pub async fn fetch_resource_owner(&self, token: &AccessToken) -> Result<ResourceOwner> {
		let observer =
			FlowObserver::start(self.adapter().id(), FlowKind::ResourceOwner, "fetch_resource_owner");
		let result = observer.instrument(self.request_resource_owner(token, &observer)).await;

		observer.finish(&result);

		result
	}

	async fn request_resource_owner(
		&self,
		token: &AccessToken,
		observer: &FlowObserver,
	) -> Result<ResourceOwner> {
		let adapter = self.adapter();
		let mut request = self
			.http_client
			.get(adapter.user_info_url(token))
			.bearer_auth(token.access_token.expose())
			.header(ACCEPT, "application/json");

		for (name, value) in adapter.user_info_headers() {
			request = request.header(*name, *value);
		}

		let response = request
			.send()
			.await
			.map_err(|err| http::map_reqwest_error(USER_INFO_ENDPOINT, err))?;
		let status = response.status();

		observer.record_status(status.as_u16());

		let bytes = response
			.bytes()
			.await
			.map_err(|err| http::map_reqwest_error(USER_INFO_ENDPOINT, err))?;
		let body = match http::decode_json(USER_INFO_ENDPOINT, &bytes, Some(status.as_u16())) {
			Ok(body) => body,
			Err(_) if !status.is_success() => return Err(unexpected_status(status)),
			Err(err) => return Err(err.into()),
		};

		adapter.validate(&body, status.as_u16())?;

		if !status.is_success() {
			return Err(unexpected_status(status));
		}

		Ok(adapter.wrap_resource_owner(body))
	}
}
impl<P> Clone for ProviderClient<P> {
	fn clone(&self) -> Self {
		Self { oauth: self.oauth.clone(), http_client: self.http_client.clone() }
	}
}
impl<P> Debug for ProviderClient<P>
where
	P: ProviderAdapter,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderClient").field("oauth", &self.oauth).finish()
	}
}

fn unexpected_status(status: StatusCode) -> Error {
	ResponseError::Unexpected {
		endpoint: USER_INFO_ENDPOINT,
		message: format!("HTTP {status}"),
		status: Some(status.as_u16()),
	}
	.into()
}
