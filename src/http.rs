//! Transport primitives shared by the token and user-info calls.
//!
//! [`ResponseMetadataSlot`] carries the status and decoded body of the last response out of
//! the `oauth2` transport handle, so adapters can inspect token bodies the crate would
//! otherwise only see in typed form.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};
use serde_json::Value;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::{ConfigError, ResponseError, TransportError};

/// Captures the most recent HTTP response for adapter validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the endpoint, if available.
	pub status: Option<u16>,
	/// Response body when it decoded as JSON.
	pub body: Option<Value>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between the transport and the caller.
///
/// A fresh slot is created per request and read as soon as `oauth2` resolves.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token endpoints answer directly; configure any custom client to disable redirect following.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that never follows redirects.
	pub fn new() -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().redirect(reqwest::redirect::Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Builds an `oauth2` transport handle that records responses in `slot`.
	pub(crate) fn instrumented(&self, slot: ResponseMetadataSlot) -> InstrumentedHandle {
		InstrumentedHandle { client: self.0.clone(), slot }
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// [`AsyncHttpClient`] handle that mirrors every response into a [`ResponseMetadataSlot`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct InstrumentedHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let response = self
				.client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let bytes = response.bytes().await.map_err(Box::new)?.to_vec();

			self.slot.store(ResponseMetadata {
				status: Some(status.as_u16()),
				body: serde_json::from_slice(&bytes).ok(),
			});

			let mut response_new = HttpResponse::new(bytes);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Decodes a JSON body with path-aware error reporting.
#[cfg(feature = "reqwest")]
pub(crate) fn decode_json(
	endpoint: &'static str,
	bytes: &[u8],
	status: Option<u16>,
) -> Result<Value, ResponseError> {
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseError::Parse { endpoint, source, status })
}

/// Maps a reqwest failure raised outside `oauth2` onto the crate error taxonomy.
#[cfg(feature = "reqwest")]
pub(crate) fn map_reqwest_error(endpoint: &'static str, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}
	if err.is_decode() {
		return ResponseError::Unexpected {
			endpoint,
			message: err.to_string(),
			status: err.status().map(|status| status.as_u16()),
		}
		.into();
	}

	TransportError::network(endpoint, err).into()
}
