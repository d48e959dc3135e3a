//! Strongly typed identifiers for providers, realms, and relying parties.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (provider, realm, relying party).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (provider, realm, relying party).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (provider, realm, relying party).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { ProviderId, "Alias of a configured identity provider (e.g. `vk`, `yandex`).", "Provider" }
def_id! { RealmId, "Realm an authentication attempt belongs to.", "Realm" }
def_id! { RelyingPartyId, "Client application that started the login.", "RelyingParty" }

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(ProviderId::new(" vk").is_err(), "Leading whitespace must be rejected.");
		assert!(ProviderId::new("vk ").is_err(), "Trailing whitespace must be rejected.");

		let provider = ProviderId::new("vk").expect("Provider fixture should be considered valid.");

		assert_eq!(provider.as_ref(), "vk");
		assert!(RealmId::new("").is_err());
		assert!(RelyingPartyId::new("account console").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let realm: RealmId =
			serde_json::from_str("\"master\"").expect("Realm should deserialize successfully.");

		assert_eq!(realm.as_ref(), "master");
		assert!(serde_json::from_str::<RealmId>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_enforced() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		ProviderId::new(&exact).expect("Exact length should succeed.");

		let err = ProviderId::new("a".repeat(IDENTIFIER_MAX_LEN + 1))
			.expect_err("Overlong identifiers should fail.");

		assert_eq!(err, IdentifierError::TooLong { kind: "Provider", max: IDENTIFIER_MAX_LEN });
	}

	#[test]
	fn debug_output_names_the_kind() {
		let party = RelyingPartyId::new("web-app").expect("Relying party fixture should be valid.");

		assert_eq!(format!("{party:?}"), "RelyingParty(web-app)");
	}
}
