//! Crate-level error types shared by the adapter and the engine glue.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The identity provider answered with an `error` payload.
	#[error(transparent)]
	Provider(#[from] ProviderError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The provider answered with something that is not a usable response.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// The `state` returned on the redirect does not match the issued one.
	#[error("Authorization state does not match the issued value.")]
	StateMismatch,
}

/// Failure reported by the identity provider inside a response body.
///
/// `code` is the provider's own numeric code when the `error` field is a structured object,
/// and `0` otherwise. The decoded body is kept for diagnostics.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("Identity provider returned an error: {message} (code {code}).")]
pub struct ProviderError {
	/// Human-readable message supplied by the provider.
	pub message: String,
	/// Provider-specific error code.
	pub code: i64,
	/// Decoded response body that carried the error.
	pub response: Value,
}
impl ProviderError {
	/// Creates an error with an empty response body.
	pub fn new(message: impl Into<String>, code: i64) -> Self {
		Self { message: message.into(), code, response: Value::Null }
	}

	/// Attaches the decoded response body.
	pub fn with_response(mut self, response: Value) -> Self {
		self.response = response;

		self
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Base URL cannot be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// The rejected value.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https.
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// The rejected scheme.
		scheme: String,
	},
	/// Base URL carries a query string or fragment that endpoint paths cannot be appended to.
	#[error("Base URL `{url}` must not carry a query or fragment.")]
	BaseUrlNotAPrefix {
		/// The rejected value.
		url: String,
	},
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	MissingClientId,
	/// An adapter produced an endpoint URL that does not parse.
	#[error("The {endpoint} endpoint is invalid.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Scopes cannot be validated.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Provider identifier is malformed.
	#[error("Provider identifier is invalid.")]
	InvalidProviderId(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Responses that cannot be turned into a token or a resource owner.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// The body is not valid JSON.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Parse {
		/// Endpoint label.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// The token body lacks required fields or carries ill-typed ones.
	#[error("Token endpoint body is missing required fields.")]
	TokenBody {
		/// Path-aware deserialization failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// `expires_in` is negative, non-numeric, or out of range.
	#[error("The expires_in value `{value}` is not a usable duration.")]
	InvalidExpiresIn {
		/// The rejected value as sent.
		value: String,
	},
	/// The endpoint answered with a non-success status and no provider error payload.
	#[error("The {endpoint} endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Endpoint label.
		endpoint: &'static str,
		/// Summary of the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
