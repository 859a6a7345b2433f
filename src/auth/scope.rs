//! Ordered scope lists requested from a provider.

// std
use std::slice::Iter;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Ordered, duplicate-free list of OAuth scopes.
///
/// An adapter's default list is reproduced exactly as declared: the first occurrence of a scope
/// keeps its position and later duplicates are dropped. An empty list is valid.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList(Vec<String>);
impl ScopeList {
	/// Creates a validated scope list from any iterator.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Vec::new();

		for scope in scopes {
			let owned: String = scope.into();

			if owned.is_empty() {
				return Err(ScopeValidationError::Empty);
			}
			if owned.chars().any(char::is_whitespace) {
				return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
			}
			if !list.contains(&owned) {
				list.push(owned);
			}
		}

		Ok(Self(list))
	}

	/// Number of scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no scopes are requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in declaration order.
	pub fn iter(&self) -> Iter<'_, String> {
		self.0.iter()
	}

	/// Joins the scopes with a provider-specific separator.
	pub fn join(&self, separator: &str) -> String {
		self.0.join(separator)
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.0).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.join(" "))
	}
}
impl TryFrom<Vec<String>> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl<'a> IntoIterator for &'a ScopeList {
	type IntoIter = Iter<'a, String>;
	type Item = &'a String;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl FromStr for ScopeList {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(char::is_whitespace) {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split_whitespace())
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		self.0.serialize(serializer)
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeList::new(values).map_err(DeError::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_keep_declaration_order_and_drop_duplicates() {
		let scopes = ScopeList::new(["profile", "email", "profile", "openid"])
			.expect("Scope fixture should be valid.");

		assert_eq!(scopes.as_slice(), ["profile", "email", "openid"]);
		assert_eq!(scopes.join(","), "profile,email,openid");
		assert!(scopes.contains("email"));
		assert!(!scopes.contains("groups"));
	}

	#[test]
	fn empty_lists_are_valid() {
		let scopes = ScopeList::new(Vec::<String>::new()).expect("Empty lists should be valid.");

		assert!(scopes.is_empty());
		assert_eq!(scopes.join(","), "");
		assert_eq!(ScopeList::from_str(""), Ok(ScopeList::default()));
	}

	#[test]
	fn invalid_scopes_error() {
		assert_eq!(ScopeList::new([""]), Err(ScopeValidationError::Empty));
		assert!(matches!(
			ScopeList::new(["contains space"]),
			Err(ScopeValidationError::ContainsWhitespace { .. })
		));
		assert!(ScopeList::from_str("   ").is_err(), "Whitespace-only input must be rejected.");
	}

	#[test]
	fn serde_round_trip_validates() {
		let scopes: ScopeList =
			serde_json::from_str("[\"openid\",\"email\"]").expect("Scopes should deserialize.");

		assert_eq!(scopes.as_slice(), ["openid", "email"]);
		assert_eq!(
			serde_json::to_string(&scopes).expect("Scopes should serialize."),
			"[\"openid\",\"email\"]"
		);
		assert!(serde_json::from_str::<ScopeList>("[\"bad scope\"]").is_err());
	}
}
