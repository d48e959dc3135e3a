//! Identity mapper contract shared by every concrete provider.
//!
//! Social networks disagree on profile field names and on whether an email address is
//! available at all, so each provider supplies an [`IdentityMapper`]. The callback state
//! machine only relies on the contract below; the error variant a mapper picks decides
//! which [`Outcome`](crate::callback::Outcome) the user ends up seeing.

/// Email acquisition and domain policy.
pub mod email;
/// JSON-driven default mapper.
pub mod json;

pub use email::*;
pub use json::*;

// self
use crate::{_prelude::*, auth::IdentityProfile, exchange::TokenResponse};

/// Strategy object that parses a token endpoint response into an [`IdentityProfile`].
///
/// Implementations must:
/// - require a non-empty account identifier, failing with [`MappingError::MissingAccountId`];
/// - apply the provider's email policy, failing with [`MappingError::EmailDomainRejected`] or
///   [`MappingError::MissingEmail`];
/// - map absent optional attributes to `None` instead of failing.
pub trait IdentityMapper: Send + Sync {
	/// Maps the raw token endpoint response into a profile.
	fn map_identity(&self, response: &TokenResponse) -> Result<IdentityProfile, MappingError>;

	/// Stable label describing the provider kind, attached to finalized identities.
	fn kind(&self) -> &str {
		"generic"
	}
}

/// Failures raised by [`IdentityMapper`] implementations.
#[derive(Debug, ThisError)]
pub enum MappingError {
	/// Response is not parseable JSON.
	#[error("Token response is malformed at `{path}`.", path = .source.path())]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Response parsed but does not have the expected shape.
	#[error("Token response has an unexpected shape: {message}")]
	UnexpectedShape {
		/// Description of the mismatch.
		message: String,
	},
	/// Response lacks a usable account identifier.
	#[error("Token response does not contain an account identifier.")]
	MissingAccountId,
	/// No usable email address could be obtained.
	#[error("Identity profile does not contain an email address.")]
	MissingEmail,
	/// Email address belongs to a domain the provider policy does not allow.
	#[error("Email domain `{domain}` is not allowed.")]
	EmailDomainRejected {
		/// Rejected domain.
		domain: String,
	},
	/// Provider embedded an OAuth error object in a successful response.
	#[error("Provider returned error `{error}`.")]
	ProviderError {
		/// Provider-supplied error code.
		error: String,
		/// Provider-supplied description, when present.
		description: Option<String>,
	},
	/// Any other provider-specific mapping failure.
	#[error("Identity mapping failed: {message}")]
	Other {
		/// Mapper-supplied description.
		message: String,
	},
}
