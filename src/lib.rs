//! Nextcloud adapter for OAuth 2.0 authorization-code flows: endpoint wiring, error-shape checks,
//! and typed resource-owner projections over dotted-path lookups.
//!
//! The crate is split into a pure core and thin engine glue:
//!
//! - [`provider`] holds the [`ProviderAdapter`](provider::ProviderAdapter) capability and the
//!   [`Nextcloud`](provider::Nextcloud) adapter, which perform no I/O.
//! - [`owner`] and [`path`] project user-info payloads into typed accessors.
//! - [`oauth`], [`http`], and (with the `reqwest` feature) [`flows`] hand the protocol mechanics to
//!   the `oauth2` and `reqwest` crates.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
#[cfg(feature = "reqwest")] pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod owner;
pub mod path;
pub mod provider;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
