//! Dotted-path lookups into loosely shaped JSON payloads.
//!
//! Provider payloads are decoded into [`Value`] and read through paths such as
//! `ocs.data.id`. Resolution is total: a missing key, a `null`, or an attempt to descend into
//! a non-object yields `None` instead of an error.

// crates.io
use serde_json::Value;

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Resolves `path` against `root`, returning the value it names.
///
/// A key that literally equals the whole path wins over the dotted interpretation, so payloads
/// carrying keys such as `"display.name"` stay reachable. `null` is treated as absent.
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
	if path.is_empty() {
		return None;
	}
	if let Some(direct) = root.as_object().and_then(|map| map.get(path)) {
		return present(direct);
	}

	let mut current = root;

	for segment in path.split(PATH_SEPARATOR) {
		current = current.as_object()?.get(segment)?;
	}

	present(current)
}

/// Resolves `path` and keeps the result only when it is a string.
pub fn resolve_str<'a>(root: &'a Value, path: &str) -> Option<&'a str> {
	resolve_path(root, path).and_then(Value::as_str)
}

fn present(value: &Value) -> Option<&Value> {
	if value.is_null() { None } else { Some(value) }
}
