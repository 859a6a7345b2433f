//! Provider-facing configuration (data) and adapters (behavior).
//!
//! `config` holds the validated client settings ([`ProviderConfig`]) an adapter is built from.
//! `adapter` defines [`ProviderAdapter`], the capability every supported identity provider
//! implements: endpoint URLs, default scopes, error-shape checks, and resource-owner wrapping.
//! `nextcloud` ships the adapter for self-hosted Nextcloud servers.

pub mod adapter;
pub mod config;
pub mod nextcloud;

pub use adapter::*;
pub use config::*;
pub use nextcloud::*;
