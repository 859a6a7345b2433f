//! Client configuration consumed by provider adapters.

// self
use crate::{_prelude::*, auth::ScopeList, error::ConfigError};

/// Immutable client settings for one provider adapter.
///
/// `base_url` never ends with a slash, so adapters can append their fixed endpoint paths
/// directly. Build values through [`ProviderConfig::builder`] or deserialize them; both paths run
/// the same validation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProviderConfigBuilder")]
pub struct ProviderConfig {
	base_url: String,
	client_id: String,
	client_secret: Option<String>,
	redirect_uri: Option<Url>,
	default_scopes: ScopeList,
}
impl ProviderConfig {
	/// Creates a new builder for the provided server base URL.
	pub fn builder(base_url: impl Into<String>) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(base_url)
	}

	/// Server base URL without a trailing slash.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Client secret for confidential clients.
	pub fn client_secret(&self) -> Option<&str> {
		self.client_secret.as_deref()
	}

	/// Redirect URI registered with the provider.
	pub fn redirect_uri(&self) -> Option<&Url> {
		self.redirect_uri.as_ref()
	}

	/// Scopes requested when the caller does not ask for any.
	pub fn default_scopes(&self) -> &ScopeList {
		&self.default_scopes
	}

	/// Appends an absolute endpoint path to the base URL.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{path}", self.base_url)
	}
}
impl Debug for ProviderConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderConfig")
			.field("base_url", &self.base_url)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &self.client_secret.is_some())
			.field("redirect_uri", &self.redirect_uri)
			.field("default_scopes", &self.default_scopes)
			.finish()
	}
}

/// Builder for [`ProviderConfig`] values.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderConfigBuilder {
	/// Server base URL, with or without a trailing slash.
	pub base_url: String,
	/// OAuth 2.0 client identifier.
	#[serde(default)]
	pub client_id: String,
	/// Optional client secret.
	#[serde(default)]
	pub client_secret: Option<String>,
	/// Optional redirect URI.
	#[serde(default)]
	pub redirect_uri: Option<String>,
	/// Scopes requested by default, in order.
	#[serde(default)]
	pub default_scopes: Vec<String>,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the base URL.
	pub fn new(base_url: impl Into<String>) -> Self {
		Self { base_url: base_url.into(), ..Default::default() }
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(uri.into());

		self
	}

	/// Replaces the default scopes.
	pub fn default_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.default_scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ConfigError> {
		let base_url = normalize_base_url(&self.base_url)?;

		if self.client_id.is_empty() {
			return Err(ConfigError::MissingClientId);
		}

		let redirect_uri = self
			.redirect_uri
			.map(|raw| Url::parse(&raw).map_err(|source| ConfigError::InvalidRedirect { source }))
			.transpose()?;
		let default_scopes = ScopeList::new(self.default_scopes)?;

		Ok(ProviderConfig {
			base_url,
			client_id: self.client_id,
			client_secret: self.client_secret,
			redirect_uri,
			default_scopes,
		})
	}
}
impl TryFrom<ProviderConfigBuilder> for ProviderConfig {
	type Error = ConfigError;

	fn try_from(value: ProviderConfigBuilder) -> Result<Self, Self::Error> {
		value.build()
	}
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
	let trimmed = raw.trim().trim_end_matches('/');
	let parsed = Url::parse(trimmed)
		.map_err(|source| ConfigError::InvalidBaseUrl { url: raw.to_owned(), source })?;

	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { scheme: parsed.scheme().to_owned() });
	}
	if parsed.query().is_some() || parsed.fragment().is_some() {
		return Err(ConfigError::BaseUrlNotAPrefix { url: raw.to_owned() });
	}

	Ok(trimmed.to_owned())
}
