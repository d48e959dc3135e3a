//! Outcome taxonomy: the single classification point for callback failures.

// self
use crate::{
	_prelude::*,
	auth::FederatedIdentity,
	obs::OutcomeLabel,
	provider::MappingError,
	reply::ErrorMessage,
};

/// Malformed redirect, malformed token response, or missing identity attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvalidRequestKind {
	/// Token response could not be parsed or had an unexpected shape.
	MalformedResponse,
	/// Token response lacks the account identifier.
	MissingAccountId,
	/// No usable email address could be obtained.
	MissingEmail,
}

/// Identity attribute rejected by provider policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecurityViolationKind {
	/// Email domain is not on the provider's allow list.
	EmailDomainRejected,
}

/// Result of a single callback invocation.
#[derive(Clone, Debug)]
pub enum Outcome {
	/// Identity produced and bound to its attempt.
	Success(Box<FederatedIdentity>),
	/// User cancelled at the provider.
	Cancelled,
	/// Provider redirected back with a non-cancel error code.
	UpstreamError(String),
	/// Request or response input was unusable.
	InvalidRequest(InvalidRequestKind),
	/// Policy rejected an identity attribute.
	SecurityViolation(SecurityViolationKind),
	/// Transport, protocol, or otherwise unexpected failure.
	InternalError,
}
impl Outcome {
	/// Classifies a broker error. This is the only place errors turn into outcomes.
	pub fn from_error(error: &Error) -> Self {
		match error {
			Error::Mapping(mapping) => match mapping {
				MappingError::MalformedResponse { .. } | MappingError::UnexpectedShape { .. } =>
					Self::InvalidRequest(InvalidRequestKind::MalformedResponse),
				MappingError::MissingAccountId =>
					Self::InvalidRequest(InvalidRequestKind::MissingAccountId),
				MappingError::MissingEmail => Self::InvalidRequest(InvalidRequestKind::MissingEmail),
				MappingError::EmailDomainRejected { .. } =>
					Self::SecurityViolation(SecurityViolationKind::EmailDomainRejected),
				MappingError::ProviderError { .. } | MappingError::Other { .. } =>
					Self::InternalError,
			},
			Error::Config(_)
			| Error::Transport(_)
			| Error::TokenEndpoint(_)
			| Error::MissingAuthorizationCode => Self::InternalError,
		}
	}

	/// Label used for logs, metrics, and audit details.
	pub fn label(&self) -> OutcomeLabel {
		match self {
			Self::Success(_) => OutcomeLabel::Success,
			Self::Cancelled => OutcomeLabel::Cancelled,
			Self::UpstreamError(_) => OutcomeLabel::UpstreamError,
			Self::InvalidRequest(_) => OutcomeLabel::InvalidRequest,
			Self::SecurityViolation(_) => OutcomeLabel::SecurityViolation,
			Self::InternalError => OutcomeLabel::InternalError,
		}
	}

	/// Returns true for every variant that must produce an error page and an audit event.
	pub fn is_failure(&self) -> bool {
		!matches!(self, Self::Success(_) | Self::Cancelled)
	}

	/// Message shown on the error page, or `None` for success and cancellation.
	pub fn error_message(&self) -> Option<ErrorMessage> {
		match self {
			Self::Success(_) | Self::Cancelled => None,
			Self::InvalidRequest(_) => Some(ErrorMessage::MissingEmail),
			Self::SecurityViolation(_) => Some(ErrorMessage::EmailDomainRejected),
			Self::UpstreamError(_) | Self::InternalError => Some(ErrorMessage::UnexpectedError),
		}
	}

	/// Returns the identity, if the callback succeeded.
	pub fn identity(&self) -> Option<&FederatedIdentity> {
		match self {
			Self::Success(identity) => Some(identity),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{TokenEndpointError, TransportError};

	#[test]
	fn mapping_errors_select_their_taxonomy_entry() {
		let cases = [
			(MappingError::MissingEmail, OutcomeLabel::InvalidRequest),
			(MappingError::MissingAccountId, OutcomeLabel::InvalidRequest),
			(MappingError::UnexpectedShape { message: "array".into() }, OutcomeLabel::InvalidRequest),
			(
				MappingError::EmailDomainRejected { domain: "evil.test".into() },
				OutcomeLabel::SecurityViolation,
			),
			(
				MappingError::ProviderError { error: "invalid_grant".into(), description: None },
				OutcomeLabel::InternalError,
			),
		];

		for (error, expected) in cases {
			assert_eq!(Outcome::from_error(&error.into()).label(), expected);
		}
	}

	#[test]
	fn transport_and_protocol_failures_are_internal() {
		let timeout = Error::from(TransportError::Other { message: "timed out".into() });
		let status =
			Error::from(TokenEndpointError::Status { status: 500, body_preview: String::new() });

		assert!(matches!(Outcome::from_error(&timeout), Outcome::InternalError));
		assert!(matches!(Outcome::from_error(&status), Outcome::InternalError));
		assert!(matches!(
			Outcome::from_error(&Error::MissingAuthorizationCode),
			Outcome::InternalError
		));
	}

	#[test]
	fn messages_follow_the_taxonomy() {
		assert_eq!(
			Outcome::InvalidRequest(InvalidRequestKind::MalformedResponse).error_message(),
			Some(ErrorMessage::MissingEmail)
		);
		assert_eq!(
			Outcome::SecurityViolation(SecurityViolationKind::EmailDomainRejected).error_message(),
			Some(ErrorMessage::EmailDomainRejected)
		);
		assert_eq!(
			Outcome::UpstreamError("server_error".into()).error_message(),
			Some(ErrorMessage::UnexpectedError)
		);
		assert_eq!(Outcome::Cancelled.error_message(), None);
		assert!(!Outcome::Cancelled.is_failure());
		assert!(Outcome::InternalError.is_failure());
	}
}
