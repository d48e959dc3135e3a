//! Optional observability helpers for callback handling.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit log events and structured spans named
//!   `oauth2_social_broker.callback` with the `provider` and `stage` fields.
//! - Enable `metrics` to increment the `oauth2_social_broker_callback_total` counter for every
//!   attempt and outcome, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

pub(crate) use tracing::log_event;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutcomeLabel {
	/// Entry to the callback handler.
	Attempt,
	/// Identity produced.
	Success,
	/// User cancelled at the provider.
	Cancelled,
	/// Provider redirected back with an error code.
	UpstreamError,
	/// Malformed response or missing identity attribute.
	InvalidRequest,
	/// Policy rejected an identity attribute.
	SecurityViolation,
	/// Transport or unexpected failure.
	InternalError,
	/// Session registry rejected the state.
	SessionRejected,
}
impl OutcomeLabel {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OutcomeLabel::Attempt => "attempt",
			OutcomeLabel::Success => "success",
			OutcomeLabel::Cancelled => "cancelled",
			OutcomeLabel::UpstreamError => "upstream_error",
			OutcomeLabel::InvalidRequest => "invalid_request",
			OutcomeLabel::SecurityViolation => "security_violation",
			OutcomeLabel::InternalError => "internal_error",
			OutcomeLabel::SessionRejected => "session_rejected",
		}
	}
}
impl Display for OutcomeLabel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
