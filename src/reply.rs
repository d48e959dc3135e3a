//! HTTP-shaped replies handed back to the web layer.
//!
//! The broker never renders HTML. It returns a [`Reply`] and lets the hosting framework
//! turn it into a response; error pages only carry a status and a message key so no
//! diagnostic detail leaks to the end user.

// crates.io
use oauth2::http::StatusCode;
// self
use crate::{_prelude::*, auth::FederatedIdentity};

/// User-visible error messages, selected by outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMessage {
	/// The identity profile lacks required contact information.
	MissingEmail,
	/// The email domain is not allowed for this provider.
	EmailDomainRejected,
	/// Generic identity provider failure.
	UnexpectedError,
	/// The login session is unknown, already used, or was tampered with.
	InvalidSession,
	/// The login session expired before the provider redirected back.
	ExpiredSession,
}
impl ErrorMessage {
	/// Stable message key for localized templates.
	pub const fn key(self) -> &'static str {
		match self {
			ErrorMessage::MissingEmail => "identityProviderMissingEmailMessage",
			ErrorMessage::EmailDomainRejected => "identityProviderEmailDomainRejectedMessage",
			ErrorMessage::UnexpectedError => "identityProviderUnexpectedErrorMessage",
			ErrorMessage::InvalidSession => "invalidLoginSessionMessage",
			ErrorMessage::ExpiredSession => "expiredLoginSessionMessage",
		}
	}

	/// Default English text.
	pub const fn text(self) -> &'static str {
		match self {
			ErrorMessage::MissingEmail =>
				"Your social network profile has no email address. Add one and try again.",
			ErrorMessage::EmailDomainRejected =>
				"Sign-in with an email address from this domain is not allowed.",
			ErrorMessage::UnexpectedError =>
				"Unexpected error when authenticating with identity provider.",
			ErrorMessage::InvalidSession => "The login session is invalid. Please start over.",
			ErrorMessage::ExpiredSession => "The login session has expired. Please start over.",
		}
	}
}
impl Display for ErrorMessage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.text())
	}
}

/// Error page description: HTTP status plus message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ErrorPage {
	/// HTTP status of the page.
	pub status: StatusCode,
	/// Message shown to the user.
	pub message: ErrorMessage,
}
impl ErrorPage {
	/// Gateway error page (HTTP 502) used for every identity provider failure.
	pub const fn bad_gateway(message: ErrorMessage) -> Self {
		Self { status: StatusCode::BAD_GATEWAY, message }
	}

	/// Client error page (HTTP 400) used for rejected login sessions.
	pub const fn bad_request(message: ErrorMessage) -> Self {
		Self { status: StatusCode::BAD_REQUEST, message }
	}
}

/// Response produced for a single callback invocation.
#[derive(Clone, Debug)]
pub enum Reply {
	/// Resume the login flow with the federated identity attached.
	Authenticated(Box<FederatedIdentity>),
	/// The user cancelled at the provider; return to the login screen.
	Cancelled,
	/// Render an error page.
	Error(ErrorPage),
}
impl Reply {
	/// Returns the error page, if this reply is one.
	pub fn error_page(&self) -> Option<&ErrorPage> {
		match self {
			Reply::Error(page) => Some(page),
			_ => None,
		}
	}

	/// Returns the identity, if the login succeeded.
	pub fn identity(&self) -> Option<&FederatedIdentity> {
		match self {
			Reply::Authenticated(identity) => Some(identity),
			_ => None,
		}
	}
}
