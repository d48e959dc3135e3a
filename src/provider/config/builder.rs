//! Validating builder for provider configurations.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, TokenSecret},
	provider::ProviderConfig,
};

/// Errors raised while constructing or validating provider configurations.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderConfigError {
	/// Token endpoint is mandatory.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// Client identifier is mandatory.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Client secret is mandatory.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Token endpoint must use HTTPS unless it targets a loopback host.
	#[error("The token endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint URL that failed validation.
		url: String,
	},
}

/// Builder for [`ProviderConfig`] values.
#[derive(Debug)]
pub struct ProviderConfigBuilder {
	/// Identifier for the configuration being constructed.
	pub id: ProviderId,
	/// Token endpoint used for the code exchange.
	pub token_endpoint: Option<Url>,
	/// OAuth 2.0 client identifier.
	pub client_id: Option<String>,
	/// OAuth 2.0 client secret.
	pub client_secret: Option<TokenSecret>,
	/// Whether the raw token response should be kept on the identity.
	pub store_token: bool,
}
impl ProviderConfigBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self { id, token_endpoint: None, client_id: None, client_secret: None, store_token: false }
	}

	/// Sets the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Toggles raw token storage.
	pub fn store_token(mut self, store_token: bool) -> Self {
		self.store_token = store_token;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ProviderConfig, ProviderConfigError> {
		let token_endpoint = self.token_endpoint.ok_or(ProviderConfigError::MissingTokenEndpoint)?;
		let client_id = self
			.client_id
			.filter(|value| !value.trim().is_empty())
			.ok_or(ProviderConfigError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|value| !value.is_empty())
			.ok_or(ProviderConfigError::MissingClientSecret)?;
		let config = ProviderConfig {
			id: self.id,
			token_endpoint,
			client_id,
			client_secret,
			store_token: self.store_token,
		};

		config.validate()?;

		Ok(config)
	}
}

impl ProviderConfig {
	/// Validates invariants for configurations that were deserialized rather than built.
	pub fn validate(&self) -> Result<(), ProviderConfigError> {
		if self.client_id.trim().is_empty() {
			return Err(ProviderConfigError::MissingClientId);
		}
		if self.client_secret.is_empty() {
			return Err(ProviderConfigError::MissingClientSecret);
		}

		validate_endpoint(&self.token_endpoint)
	}
}

fn validate_endpoint(url: &Url) -> Result<(), ProviderConfigError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ProviderConfigError::InsecureEndpoint { url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
		Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
		None => false,
	}
}
