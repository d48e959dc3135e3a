//! Provider configuration shared by the exchange client and the callback state machine.

/// Builder API for assembling provider configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenSecret},
};

/// Immutable provider configuration read by the callback state machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// Provider alias, used for logging and session binding checks.
	pub id: ProviderId,
	/// Token endpoint receiving the authorization code exchange.
	pub token_endpoint: Url,
	/// OAuth 2.0 client identifier registered with the provider.
	pub client_id: String,
	/// OAuth 2.0 client secret registered with the provider.
	pub client_secret: TokenSecret,
	/// Keeps the raw token response on the identity when the mapper did not attach one.
	#[serde(default)]
	pub store_token: bool,
}
impl ProviderConfig {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderConfigBuilder {
		ProviderConfigBuilder::new(id)
	}
}
