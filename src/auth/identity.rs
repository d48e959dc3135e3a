//! Identity records produced by mappers and finalized by the callback state machine.

// self
use crate::{_prelude::*, auth::TokenSecret, provider::ProviderConfig, session::AuthenticationAttempt};

/// Provider-neutral profile returned by an [`IdentityMapper`](crate::provider::IdentityMapper).
///
/// Only `id` is mandatory; every other attribute is optional and stays `None` when the
/// provider omitted it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityProfile {
	/// Unique account identifier at the provider.
	pub id: String,
	/// Email address after the provider's email policy was applied.
	pub email: Option<String>,
	/// Login or nickname at the provider.
	pub username: Option<String>,
	/// Given name.
	pub first_name: Option<String>,
	/// Family name.
	pub last_name: Option<String>,
	/// Additional display attributes keyed by attribute name.
	pub attributes: BTreeMap<String, String>,
	/// Token the mapper chose to keep, if any.
	pub token: Option<TokenSecret>,
}
impl IdentityProfile {
	/// Creates a profile carrying only the account identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), ..Default::default() }
	}

	/// Sets the email address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Sets the stored token.
	pub fn with_token(mut self, token: TokenSecret) -> Self {
		self.token = Some(token);

		self
	}

	/// Display name assembled from first and last name, falling back to the username.
	pub fn display_name(&self) -> Option<String> {
		match (self.first_name.as_deref(), self.last_name.as_deref()) {
			(Some(first), Some(last)) => Some(format!("{first} {last}")),
			(Some(name), None) | (None, Some(name)) => Some(name.to_owned()),
			(None, None) => self.username.clone(),
		}
	}
}

/// Canonical identity handed to the outcome reporter after a successful callback.
///
/// Instances only exist fully bound: the profile, the provider configuration, the mapper
/// that produced it, and the authentication attempt it completes.
#[derive(Clone, Debug)]
pub struct FederatedIdentity {
	profile: IdentityProfile,
	config: Arc<ProviderConfig>,
	provider_kind: String,
	attempt: AuthenticationAttempt,
}
impl FederatedIdentity {
	pub(crate) fn finalize(
		profile: IdentityProfile,
		config: Arc<ProviderConfig>,
		provider_kind: impl Into<String>,
		attempt: AuthenticationAttempt,
	) -> Self {
		Self { profile, config, provider_kind: provider_kind.into(), attempt }
	}

	/// Mapped profile.
	pub fn profile(&self) -> &IdentityProfile {
		&self.profile
	}

	/// Unique account identifier at the provider.
	pub fn id(&self) -> &str {
		&self.profile.id
	}

	/// Email address, when the provider policy produced one.
	pub fn email(&self) -> Option<&str> {
		self.profile.email.as_deref()
	}

	/// Stored token, when the mapper or the `store_token` flag attached one.
	pub fn token(&self) -> Option<&TokenSecret> {
		self.profile.token.as_ref()
	}

	/// Configuration of the provider that authenticated the user.
	pub fn config(&self) -> &Arc<ProviderConfig> {
		&self.config
	}

	/// Kind label of the mapper that produced the profile.
	pub fn provider_kind(&self) -> &str {
		&self.provider_kind
	}

	/// Authentication attempt completed by this identity.
	pub fn attempt(&self) -> &AuthenticationAttempt {
		&self.attempt
	}
}
