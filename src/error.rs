//! Broker-level error types shared across the exchange, mapping, and callback layers.

// self
use crate::{
	_prelude::*,
	provider::{MappingError, ProviderConfigError},
};

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical broker error raised while completing a callback.
///
/// Callers never see this type from [`handle_callback`](crate::callback::CallbackBroker::handle_callback);
/// it is folded into an [`Outcome`](crate::callback::Outcome) at a single classification point.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with something other than a usable body.
	#[error(transparent)]
	TokenEndpoint(#[from] TokenEndpointError),
	/// Provider identity mapper rejected the token response.
	#[error(transparent)]
	Mapping(#[from] MappingError),

	/// Redirect carried neither an authorization code nor an error.
	#[error("Callback did not carry an authorization code.")]
	MissingAuthorizationCode,
}

/// Configuration and request-construction failures raised by the broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Provider configuration failed validation.
	#[error(transparent)]
	Provider(#[from] ProviderConfigError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Token endpoint responses that cannot be handed to an identity mapper.
#[derive(Debug, ThisError)]
pub enum TokenEndpointError {
	/// Provider returned a non-success HTTP status.
	#[error("Token endpoint returned HTTP {status}: {body_preview}")]
	Status {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Truncated response body for diagnostics.
		body_preview: String,
	},
	/// Response body is not valid UTF-8.
	#[error("Token endpoint returned a body that is not valid UTF-8.")]
	NonUtf8Body {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Decoding failure.
		#[source]
		source: std::string::FromUtf8Error,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The HTTP client gave up waiting for the token endpoint.
	#[error("Request timed out while calling the token endpoint.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured error.
	#[error("HTTP client error occurred while calling the token endpoint: {message}")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn mapping_error_converts_into_broker_error_with_source() {
		let broker_error: Error = MappingError::MissingEmail.into();

		assert!(matches!(broker_error, Error::Mapping(MappingError::MissingEmail)));
		assert_eq!(broker_error.to_string(), MappingError::MissingEmail.to_string());
	}

	#[test]
	fn token_endpoint_status_mentions_preview() {
		let err = TokenEndpointError::Status { status: 401, body_preview: "denied".into() };

		assert_eq!(err.to_string(), "Token endpoint returned HTTP 401: denied");
	}
}
