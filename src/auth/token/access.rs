//! Access-token value object built from a validated token endpoint body.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ResponseError, path};

/// Token issued by the provider's token endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Token type reported by the provider (usually `bearer`).
	pub token_type: String,
	/// Expiry instant derived from `expires_in`, if the provider sent one.
	pub expires_at: Option<OffsetDateTime>,
	/// Refresh token secret, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
	/// Resource owner named by the token body, for providers that include one.
	pub resource_owner_id: Option<String>,
}
impl AccessToken {
	/// Creates a token without expiry, refresh token, or owner.
	pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			token_type: token_type.into(),
			expires_at: None,
			refresh_token: None,
			resource_owner_id: None,
		}
	}

	/// Reads a token out of a decoded token endpoint body.
	///
	/// `expires_in` is accepted as a number or a numeric string and is anchored at
	/// `issued_at`. `owner_id_path` names the dotted path of the resource owner identifier in
	/// the body, when the provider sends one.
	pub fn from_body(
		body: &Value,
		owner_id_path: Option<&str>,
		issued_at: OffsetDateTime,
	) -> Result<Self, ResponseError> {
		let parsed: TokenBody = serde_path_to_error::deserialize(body)
			.map_err(|source| ResponseError::TokenBody { source })?;
		let expires_at = match parsed.expires_in {
			Some(ExpiresIn::Seconds(secs)) => Some(expiry(issued_at, secs)?),
			Some(ExpiresIn::Text(raw)) => {
				let secs = raw
					.trim()
					.parse::<i64>()
					.map_err(|_| ResponseError::InvalidExpiresIn { value: raw.clone() })?;

				Some(expiry(issued_at, secs)?)
			},
			None => None,
		};
		let resource_owner_id = owner_id_path
			.and_then(|path| path::resolve_path(body, path))
			.and_then(|value| match value {
				Value::String(id) => Some(id.clone()),
				Value::Number(id) => Some(id.to_string()),
				_ => None,
			});

		Ok(Self {
			access_token: TokenSecret::new(parsed.access_token),
			token_type: parsed.token_type,
			expires_at,
			refresh_token: parsed.refresh_token.map(TokenSecret::new),
			resource_owner_id,
		})
	}

	/// Returns `true` if the token carries an expiry at or before `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Returns `true` if the token has expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_at", &self.expires_at)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("resource_owner_id", &self.resource_owner_id)
			.finish()
	}
}

#[derive(Deserialize)]
struct TokenBody {
	access_token: String,
	token_type: String,
	#[serde(default)]
	expires_in: Option<ExpiresIn>,
	#[serde(default)]
	refresh_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExpiresIn {
	Seconds(i64),
	Text(String),
}

fn expiry(issued_at: OffsetDateTime, secs: i64) -> Result<OffsetDateTime, ResponseError> {
	if secs < 0 {
		return Err(ResponseError::InvalidExpiresIn { value: secs.to_string() });
	}

	issued_at
		.checked_add(Duration::seconds(secs))
		.ok_or_else(|| ResponseError::InvalidExpiresIn { value: secs.to_string() })
}
