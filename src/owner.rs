//! Resource-owner projections over raw user-info payloads.

// crates.io
use serde::Serializer;
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	path::{self, resolve_path},
};

/// Dotted paths an adapter reads its resource-owner fields from.
///
/// The paths are per-adapter constants; they never come from user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OwnerPaths {
	/// Path of the stable user identifier.
	pub id: &'static str,
	/// Path of the display name.
	pub name: &'static str,
	/// Path of the email address.
	pub email: &'static str,
	/// Path of the group membership list.
	pub groups: &'static str,
	/// Path of the object holding every owner detail; `None` when the payload is flat.
	pub details: Option<&'static str>,
}

/// Read-only view over a decoded user-info payload.
///
/// Every accessor is a pure projection. Missing or oddly shaped fields read as `None`, which
/// callers should treat as "not provided by this identity provider".
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceOwner {
	payload: Value,
	paths: OwnerPaths,
}
impl ResourceOwner {
	/// Wraps a payload that has already passed provider validation.
	pub fn new(payload: Value, paths: OwnerPaths) -> Self {
		Self { payload, paths }
	}

	/// Stable identifier; numeric identifiers are rendered in decimal.
	pub fn id(&self) -> Option<String> {
		match resolve_path(&self.payload, self.paths.id)? {
			Value::String(id) => Some(id.clone()),
			Value::Number(id) => Some(id.to_string()),
			_ => None,
		}
	}

	/// Display name.
	pub fn name(&self) -> Option<&str> {
		path::resolve_str(&self.payload, self.paths.name)
	}

	/// Email address.
	pub fn email(&self) -> Option<&str> {
		path::resolve_str(&self.payload, self.paths.email)
	}

	/// Group memberships. Non-string members are skipped.
	pub fn groups(&self) -> Option<Vec<String>> {
		let groups = resolve_path(&self.payload, self.paths.groups)?.as_array()?;

		Some(groups.iter().filter_map(Value::as_str).map(str::to_owned).collect())
	}

	/// Every owner detail the provider returned.
	///
	/// Returns the object under the details path, the whole payload for flat schemas, or an
	/// empty map when neither is an object.
	pub fn to_map(&self) -> Map<String, Value> {
		self.details().and_then(Value::as_object).cloned().unwrap_or_default()
	}

	/// Looks up an arbitrary dotted path relative to the payload root.
	pub fn get(&self, path: &str) -> Option<&Value> {
		resolve_path(&self.payload, path)
	}

	/// The untouched payload.
	pub fn raw(&self) -> &Value {
		&self.payload
	}

	/// Paths this owner reads from.
	pub fn paths(&self) -> &OwnerPaths {
		&self.paths
	}

	/// Releases the payload.
	pub fn into_raw(self) -> Value {
		self.payload
	}

	fn details(&self) -> Option<&Value> {
		match self.paths.details {
			Some(path) => resolve_path(&self.payload, path),
			None => Some(&self.payload),
		}
	}
}
impl Serialize for ResourceOwner {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.to_map().serialize(serializer)
	}
}
