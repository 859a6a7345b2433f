//! OAuth 2.0 client facade built from a provider adapter.
//!
//! The `oauth2` crate owns the protocol mechanics (query encoding, client authentication, typed
//! token parsing). This module feeds it the adapter's endpoints and hands every token body back
//! to [`ProviderAdapter::validate`] before a token is returned.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, AuthUrl, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet, RedirectUrl,
	TokenUrl, basic::BasicClient,
};
#[cfg(feature = "reqwest")]
use oauth2::{
	AuthorizationCode, HttpClientError, RefreshToken, RequestTokenError,
	basic::{BasicRequestTokenError, BasicTokenResponse},
};
// self
use crate::{_prelude::*, error::ConfigError, provider::ProviderAdapter};
#[cfg(feature = "reqwest")]
use crate::{
	auth::{AccessToken, TokenSecret},
	error::{ResponseError, TransportError},
	http::{self, ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
#[cfg(feature = "reqwest")]
type TokenOutcome =
	Result<BasicTokenResponse, BasicRequestTokenError<HttpClientError<ReqwestError>>>;

#[cfg(feature = "reqwest")]
const TOKEN_ENDPOINT: &str = "token";

/// Authorization redirect produced by [`OAuthClient::authorize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationSession {
	/// URL the user agent should be redirected to.
	pub url: Url,
	/// Anti-forgery value embedded in `url`; keep it until the callback arrives.
	pub state: String,
}
impl AuthorizationSession {
	/// Checks the `state` echoed back on the redirect.
	pub fn validate_state(&self, returned: &str) -> Result<()> {
		if returned.is_empty() || returned != self.state {
			return Err(Error::StateMismatch);
		}

		Ok(())
	}
}

/// `oauth2` client configured from a [`ProviderAdapter`].
pub struct OAuthClient<P> {
	adapter: Arc<P>,
	oauth_client: ConfiguredBasicClient,
}
impl<P> OAuthClient<P>
where
	P: ProviderAdapter,
{
	/// Builds the client from the adapter's endpoints and credentials.
	///
	/// Client credentials travel in the token request body.
	pub fn new(adapter: impl Into<Arc<P>>) -> Result<Self> {
		let adapter = adapter.into();
		let config = adapter.config();
		let auth_url = AuthUrl::new(adapter.authorization_url())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "authorization", source })?;
		let token_url = TokenUrl::new(adapter.token_url())
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;
		let mut oauth_client = BasicClient::new(ClientId::new(config.client_id().to_owned()))
			.set_auth_uri(auth_url)
			.set_token_uri(token_url)
			.set_auth_type(AuthType::RequestBody);

		if let Some(secret) = config.client_secret() {
			oauth_client = oauth_client.set_client_secret(ClientSecret::new(secret.to_owned()));
		}
		if let Some(redirect) = config.redirect_uri() {
			let redirect_url = RedirectUrl::new(redirect.to_string())
				.map_err(|source| ConfigError::InvalidRedirect { source })?;

			oauth_client = oauth_client.set_redirect_uri(redirect_url);
		}

		Ok(Self { adapter, oauth_client })
	}

	/// Adapter this client was built from.
	pub fn adapter(&self) -> &P {
		&self.adapter
	}

	/// Builds an authorization redirect requesting the adapter's default scopes.
	pub fn authorize(&self) -> AuthorizationSession {
		self.authorize_with_scopes(self.adapter.default_scopes())
	}

	/// Builds an authorization redirect requesting `scopes`.
	///
	/// The `scope` parameter is always present, joined with the adapter's separator, and the
	/// adapter's fixed authorization parameters are appended after it.
	pub fn authorize_with_scopes<S>(&self, scopes: &[S]) -> AuthorizationSession
	where
		S: AsRef<str>,
	{
		let scope = scopes
			.iter()
			.map(AsRef::as_ref)
			.collect::<Vec<_>>()
			.join(self.adapter.scope_separator());
		let mut request =
			self.oauth_client.authorize_url(CsrfToken::new_random).add_extra_param("scope", scope);

		for (name, value) in self.adapter.authorization_parameters() {
			request = request.add_extra_param(*name, *value);
		}

		let (url, state) = request.url();

		AuthorizationSession { url, state: state.secret().to_owned() }
	}

	/// Exchanges an authorization code at the token endpoint.
	#[cfg(feature = "reqwest")]
	pub(crate) async fn exchange_code(
		&self,
		http_client: &ReqwestHttpClient,
		code: String,
	) -> Result<AccessToken> {
		let meta = ResponseMetadataSlot::default();
		let handle = http_client.instrumented(meta.clone());
		let outcome = self
			.oauth_client
			.exchange_code(AuthorizationCode::new(code))
			.request_async(&handle)
			.await;

		self.settle(meta.take(), outcome)
	}

	/// Redeems a refresh token; the old refresh token is kept when the provider does not rotate it.
	#[cfg(feature = "reqwest")]
	pub(crate) async fn refresh(
		&self,
		http_client: &ReqwestHttpClient,
		refresh_token: &TokenSecret,
	) -> Result<AccessToken> {
		let meta = ResponseMetadataSlot::default();
		let handle = http_client.instrumented(meta.clone());
		let secret = RefreshToken::new(refresh_token.expose().to_owned());
		let outcome =
			self.oauth_client.exchange_refresh_token(&secret).request_async(&handle).await;
		let mut token = self.settle(meta.take(), outcome)?;

		if token.refresh_token.is_none() {
			token.refresh_token = Some(refresh_token.clone());
		}

		Ok(token)
	}

	#[cfg(feature = "reqwest")]
	fn settle(&self, meta: Option<ResponseMetadata>, outcome: TokenOutcome) -> Result<AccessToken> {
		let ResponseMetadata { status, body } = meta.unwrap_or_default();

		if let Some(body) = &body {
			self.adapter.validate(body, status.unwrap_or_default())?;
		}

		match (outcome, body) {
			(Ok(_), Some(body)) => Ok(AccessToken::from_body(
				&body,
				self.adapter.access_token_resource_owner_id(),
				OffsetDateTime::now_utc(),
			)?),
			(Ok(_), None) => Err(ResponseError::Unexpected {
				endpoint: TOKEN_ENDPOINT,
				message: "the token body could not be captured".into(),
				status,
			}
			.into()),
			(Err(err), _) => Err(map_request_error(err, status)),
		}
	}
}
impl<P> Clone for OAuthClient<P> {
	fn clone(&self) -> Self {
		Self { adapter: Arc::clone(&self.adapter), oauth_client: self.oauth_client.clone() }
	}
}
impl<P> Debug for OAuthClient<P>
where
	P: ProviderAdapter,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthClient").field("provider", self.adapter.id()).finish()
	}
}

#[cfg(feature = "reqwest")]
fn map_request_error(
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
	status: Option<u16>,
) -> Error {
	let unexpected = |message: String| -> Error {
		ResponseError::Unexpected { endpoint: TOKEN_ENDPOINT, message, status }.into()
	};

	match err {
		RequestTokenError::ServerResponse(response) =>
			unexpected(format!("OAuth error `{}`", response.error().as_ref())),
		RequestTokenError::Request(error) => match error {
			HttpClientError::Reqwest(inner) => http::map_reqwest_error(TOKEN_ENDPOINT, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => unexpected(message),
			_ => unexpected("HTTP client error".into()),
		},
		RequestTokenError::Parse(source, _body) =>
			ResponseError::Parse { endpoint: TOKEN_ENDPOINT, source, status }.into(),
		RequestTokenError::Other(message) => unexpected(message),
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;
	use crate::provider::{Nextcloud, ProviderConfig};

	fn client(scopes: &[&str]) -> OAuthClient<Nextcloud> {
		let config = ProviderConfig::builder("https://cloud.example.com")
			.client_id("mock_client_id")
			.client_secret("mock_secret")
			.redirect_uri("https://app.example.com/callback")
			.default_scopes(scopes.iter().copied())
			.build()
			.expect("Fixture config should build.");

		OAuthClient::new(Nextcloud::new(config)).expect("Fixture client should build.")
	}

	fn query(session: &AuthorizationSession) -> HashMap<String, String> {
		session.url.query_pairs().into_owned().collect()
	}

	#[test]
	fn authorize_url_carries_the_standard_parameters() {
		let session = client(&[]).authorize();
		let query = query(&session);

		assert_eq!(session.url.path(), "/apps/oauth2/authorize");

		for key in ["client_id", "redirect_uri", "state", "scope", "response_type", "approval_prompt"]
		{
			assert!(query.contains_key(key), "Authorization URL must carry `{key}`.");
		}

		assert_eq!(query["client_id"], "mock_client_id");
		assert_eq!(query["response_type"], "code");
		assert_eq!(query["approval_prompt"], "auto");
		assert_eq!(query["scope"], "");
		assert_eq!(query["state"], session.state);
	}

	#[test]
	fn scopes_are_joined_with_the_adapter_separator() {
		let session = client(&["openid", "email"]).authorize();

		assert_eq!(query(&session)["scope"], "openid,email");

		let session = client(&["openid"]).authorize_with_scopes(&["profile", "groups"]);

		assert_eq!(query(&session)["scope"], "profile,groups");
	}

	#[test]
	fn every_session_gets_a_fresh_state() {
		let client = client(&[]);
		let first = client.authorize();
		let second = client.authorize();

		assert!(!first.state.is_empty());
		assert_ne!(first.state, second.state);
	}

	#[test]
	fn state_validation_requires_an_exact_match() {
		let session = client(&[]).authorize();
		let state = session.state.clone();

		assert!(session.validate_state(&state).is_ok());
		assert!(matches!(session.validate_state("forged"), Err(Error::StateMismatch)));
		assert!(matches!(session.validate_state(""), Err(Error::StateMismatch)));
	}
}
