//! Audit event contract plus in-memory and log-forwarding sinks.

// self
use crate::{
	_prelude::*,
	auth::{ProviderId, RealmId, RelyingPartyId},
};

/// Audit event types emitted by the broker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditEventType {
	/// Login attempt through an identity provider.
	#[serde(rename = "LOGIN")]
	Login,
}
impl AuditEventType {
	/// Returns a stable label suitable for event sinks.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditEventType::Login => "LOGIN",
		}
	}
}
impl Display for AuditEventType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error codes attached to failed audit events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditError {
	/// Login through the identity provider failed.
	#[serde(rename = "identity-provider-login-failure")]
	IdentityProviderLoginFailure,
}
impl AuditError {
	/// Returns a stable label suitable for event sinks.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditError::IdentityProviderLoginFailure => "identity-provider-login-failure",
		}
	}
}
impl Display for AuditError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Single audit record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
	/// Event type.
	pub event_type: AuditEventType,
	/// Error code, for failed events.
	pub error: Option<AuditError>,
	/// Provider whose callback produced the event.
	pub provider: ProviderId,
	/// Realm of the resolved attempt, when one was resolved.
	pub realm: Option<RealmId>,
	/// Client of the resolved attempt, when one was resolved.
	pub client: Option<RelyingPartyId>,
	/// Outcome label that triggered the event.
	pub detail: Option<String>,
	/// Instant the event was recorded.
	pub recorded_at: OffsetDateTime,
}
impl AuditEvent {
	/// Creates a failed `LOGIN` event for the provided provider.
	pub fn login_failure(provider: ProviderId) -> Self {
		Self {
			event_type: AuditEventType::Login,
			error: Some(AuditError::IdentityProviderLoginFailure),
			provider,
			realm: None,
			client: None,
			detail: None,
			recorded_at: OffsetDateTime::now_utc(),
		}
	}

	/// Attaches the outcome label.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());

		self
	}
}

/// Destination for audit events.
pub trait AuditSink
where
	Self: Send + Sync,
{
	/// Records a single event.
	fn record(&self, event: AuditEvent);
}

/// Sink that keeps events in memory for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuditSink(Arc<Mutex<Vec<AuditEvent>>>);
impl MemoryAuditSink {
	/// Snapshot of every recorded event.
	pub fn events(&self) -> Vec<AuditEvent> {
		self.0.lock().clone()
	}

	/// Number of recorded events.
	pub fn len(&self) -> usize {
		self.0.lock().len()
	}

	/// Returns true when nothing was recorded.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}
}
impl AuditSink for MemoryAuditSink {
	fn record(&self, event: AuditEvent) {
		self.0.lock().push(event);
	}
}

/// Sink forwarding events to the `tracing` pipeline (a no-op without the `tracing` feature).
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAuditSink;
impl AuditSink for LogAuditSink {
	fn record(&self, event: AuditEvent) {
		crate::obs::log_event!(
			warn,
			event_type = event.event_type.as_str(),
			error = event.error.map(AuditError::as_str),
			provider = %event.provider,
			realm = event.realm.as_deref(),
			client = event.client.as_deref(),
			detail = event.detail.as_deref(),
			"Audit event recorded."
		);

		#[cfg(not(feature = "tracing"))]
		let _ = event;
	}
}
