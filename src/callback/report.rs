//! Turns outcomes into replies and records audit events for failed logins.

// self
use crate::{
	_prelude::*,
	audit::{AuditEvent, AuditSink},
	auth::ProviderId,
	callback::Outcome,
	reply::{ErrorMessage, ErrorPage, Reply},
	session::AuthenticationAttempt,
};

/// Context the reporter needs besides the outcome itself.
#[derive(Clone, Copy, Debug)]
pub struct ReportScope<'a> {
	/// Provider whose callback produced the outcome.
	pub provider: &'a ProviderId,
	/// Attempt bound during the callback, if the session was resolved.
	pub attempt: Option<&'a AuthenticationAttempt>,
}

/// Turns a classified [`Outcome`] into the reply handed to the web layer.
pub trait OutcomeReporter
where
	Self: Send + Sync,
{
	/// Builds the reply for `outcome`, emitting any side effects (audit events) first.
	fn report(&self, scope: ReportScope<'_>, outcome: Outcome) -> Reply;
}

/// Default reporter: gateway error pages plus one audit event per failure.
#[derive(Clone)]
pub struct GatewayReporter {
	audit: Arc<dyn AuditSink>,
}
impl GatewayReporter {
	/// Creates a reporter recording failures into `audit`.
	pub fn new(audit: Arc<dyn AuditSink>) -> Self {
		Self { audit }
	}
}
impl OutcomeReporter for GatewayReporter {
	fn report(&self, scope: ReportScope<'_>, outcome: Outcome) -> Reply {
		let message = match outcome {
			Outcome::Success(identity) => return Reply::Authenticated(identity),
			Outcome::Cancelled => return Reply::Cancelled,
			ref failure => failure.error_message().unwrap_or(ErrorMessage::UnexpectedError),
		};
		let mut event =
			AuditEvent::login_failure(scope.provider.clone()).with_detail(outcome.label().as_str());

		if let Some(attempt) = scope.attempt {
			event.realm = Some(attempt.realm.clone());
			event.client = Some(attempt.client.clone());
		}

		self.audit.record(event);

		Reply::Error(ErrorPage::bad_gateway(message))
	}
}
impl Debug for GatewayReporter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("GatewayReporter(..)")
	}
}
