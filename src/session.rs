//! Authentication session contracts and the built-in in-memory registry.
//!
//! Login initiation creates an [`AuthenticationAttempt`] keyed by an opaque state token.
//! The callback resolves it exactly once; a registry must refuse to resolve the same state
//! a second time so a replayed redirect cannot produce a second login.

pub mod memory;

pub use memory::MemorySessionRegistry;

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, RealmId, RelyingPartyId},
	reply::{ErrorMessage, ErrorPage, Reply},
};

/// Boxed future returned by [`AuthenticationSessionRegistry::resolve`].
pub type SessionFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, SessionResolutionFailure>> + 'a + Send>>;

/// Session registry contract implemented by the hosting application.
pub trait AuthenticationSessionRegistry
where
	Self: Send + Sync,
{
	/// Resolves and consumes the attempt bound to `state`.
	///
	/// Unknown, expired, tampered, or already-consumed states must fail.
	fn resolve<'a>(&'a self, state: &'a str) -> SessionFuture<'a, AuthenticationAttempt>;
}

/// In-flight login attempt, created at login initiation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationAttempt {
	/// Realm the login belongs to.
	pub realm: RealmId,
	/// Client application that started the login.
	pub client: RelyingPartyId,
	/// Provider the user was sent to.
	pub provider: ProviderId,
	/// Instant the attempt was created.
	pub issued_at: OffsetDateTime,
	/// Instant after which the attempt can no longer be resolved.
	pub expires_at: OffsetDateTime,
}
impl AuthenticationAttempt {
	/// Default lifetime of an attempt.
	pub const DEFAULT_TTL: Duration = Duration::minutes(30);

	/// Creates an attempt issued now with [`Self::DEFAULT_TTL`].
	pub fn new(realm: RealmId, client: RelyingPartyId, provider: ProviderId) -> Self {
		let issued_at = OffsetDateTime::now_utc();

		Self { realm, client, provider, issued_at, expires_at: issued_at + Self::DEFAULT_TTL }
	}

	/// Overrides the lifetime relative to `issued_at`.
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.expires_at = self.issued_at + ttl;

		self
	}

	/// Returns true once `now` reached the expiry instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}
}

/// Reason a state token could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionRejection {
	/// Callback carried no state.
	MissingState,
	/// State is unknown or was already consumed.
	UnknownState,
	/// Attempt expired before the callback arrived.
	Expired,
	/// Attempt was started for a different provider.
	ProviderMismatch {
		/// Provider the attempt was started for.
		expected: ProviderId,
		/// Provider whose callback endpoint received the state.
		actual: ProviderId,
	},
	/// Registry backend failed.
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl Display for SessionRejection {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::MissingState => f.write_str("Callback did not carry a state parameter."),
			Self::UnknownState => f.write_str("State is unknown or was already used."),
			Self::Expired => f.write_str("Authentication session expired."),
			Self::ProviderMismatch { expected, actual } => write!(
				f,
				"Authentication session belongs to provider `{expected}`, not `{actual}`."
			),
			Self::Backend { message } => write!(f, "Session registry failure: {message}."),
		}
	}
}

/// Structured session failure carrying its own HTTP-shaped reply.
///
/// The callback state machine returns it verbatim, bypassing outcome classification.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{rejection}")]
pub struct SessionResolutionFailure {
	/// Why the state was rejected.
	pub rejection: SessionRejection,
	/// Page the user should see.
	pub page: ErrorPage,
}
impl SessionResolutionFailure {
	/// Builds a failure with the default page for the rejection.
	pub fn new(rejection: SessionRejection) -> Self {
		let page = match &rejection {
			SessionRejection::Expired => ErrorPage::bad_request(ErrorMessage::ExpiredSession),
			SessionRejection::Backend { .. } =>
				ErrorPage::bad_gateway(ErrorMessage::UnexpectedError),
			_ => ErrorPage::bad_request(ErrorMessage::InvalidSession),
		};

		Self { rejection, page }
	}

	/// Replaces the page rendered for this failure.
	pub fn with_page(mut self, page: ErrorPage) -> Self {
		self.page = page;

		self
	}

	/// Converts the failure into the reply handed to the web layer.
	pub fn into_reply(self) -> Reply {
		Reply::Error(self.page)
	}
}
impl From<SessionRejection> for SessionResolutionFailure {
	fn from(rejection: SessionRejection) -> Self {
		Self::new(rejection)
	}
}
