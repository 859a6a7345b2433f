//! The capability every supported identity provider implements.
//!
//! Adapters are immutable after construction and perform no I/O: URLs are pure functions of
//! the configuration, and response inspection is a pure function of the decoded body. The
//! engine glue in [`crate::oauth`] and [`crate::flows`] drives them.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ProviderId},
	error::ProviderError,
	owner::ResourceOwner,
	provider::ProviderConfig,
};

/// Provider-specific half of an authorization-code flow.
///
/// New identity providers are supported by implementing this trait. Only the optional
/// capabilities at the bottom carry defaults.
pub trait ProviderAdapter: Send + Sync {
	/// Stable identifier used in spans and metric labels.
	fn id(&self) -> &ProviderId;

	/// Client settings the adapter was built from.
	fn config(&self) -> &ProviderConfig;

	/// Authorization endpoint, without any query string.
	fn authorization_url(&self) -> String;

	/// Token endpoint.
	fn token_url(&self) -> String;

	/// User-info endpoint. The token travels as a bearer header, never inside the URL.
	fn user_info_url(&self, token: &AccessToken) -> String;

	/// Scopes requested when the caller does not ask for any; may be empty.
	fn default_scopes(&self) -> &[String];

	/// Decides whether a decoded response body reports a failure.
	///
	/// `http_status` is informational only. A body carrying an `error` field fails even when it
	/// arrived with `200 OK`.
	fn validate(&self, body: &Value, http_status: u16) -> Result<(), ProviderError>;

	/// Wraps a validated user-info body.
	fn wrap_resource_owner(&self, body: Value) -> ResourceOwner;

	/// Separator used to join scopes into the `scope` parameter.
	fn scope_separator(&self) -> &str {
		" "
	}

	/// Fixed query parameters appended to every authorization URL.
	fn authorization_parameters(&self) -> &[(&'static str, &'static str)] {
		&[]
	}

	/// Extra headers the user-info endpoint expects.
	fn user_info_headers(&self) -> &[(&'static str, &'static str)] {
		&[]
	}

	/// Dotted path of the resource owner identifier inside token bodies.
	fn access_token_resource_owner_id(&self) -> Option<&str> {
		None
	}
}

/// Checks a decoded body for the conventional `error` field.
///
/// An absent or empty `error` passes. A structured `error` object yields its `message` and
/// `code` (0 when missing); any other value becomes the message with code 0. The body is
/// attached to the returned error.
pub fn check_error_field(body: &Value) -> Result<(), ProviderError> {
	let Some(error) = body.get("error").filter(|error| !is_empty(error)) else {
		return Ok(());
	};
	let (message, code) = match error {
		Value::Object(fields) => (
			fields.get("message").map(scalar_text).unwrap_or_else(|| error.to_string()),
			fields.get("code").and_then(error_code).unwrap_or(0),
		),
		other => (scalar_text(other), 0),
	};

	Err(ProviderError::new(message, code).with_response(body.clone()))
}

fn is_empty(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::Number(number) => number.as_f64() == Some(0.0),
		Value::String(text) => text.is_empty() || text == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(fields) => fields.is_empty(),
	}
}

fn scalar_text(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

fn error_code(value: &Value) -> Option<i64> {
	match value {
		Value::Number(number) => number.as_i64(),
		Value::String(text) => text.trim().parse().ok(),
		_ => None,
	}
}
