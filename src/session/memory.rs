//! Thread-safe in-memory [`AuthenticationSessionRegistry`] for local development and tests.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	session::{
		AuthenticationAttempt, AuthenticationSessionRegistry, SessionFuture, SessionRejection,
		SessionResolutionFailure,
	},
};

const STATE_LEN: usize = 32;

type AttemptMap = Arc<RwLock<HashMap<String, AuthenticationAttempt>>>;

/// Registry that keeps attempts in-process and consumes them on resolution.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionRegistry(AttemptMap);
impl MemorySessionRegistry {
	/// Registers an attempt under a freshly generated state token and returns the token.
	pub fn open(&self, attempt: AuthenticationAttempt) -> String {
		let state = random_string(STATE_LEN);

		self.0.write().insert(state.clone(), attempt);

		state
	}

	/// Registers an attempt under a caller-chosen state token.
	pub fn insert(&self, state: impl Into<String>, attempt: AuthenticationAttempt) {
		self.0.write().insert(state.into(), attempt);
	}

	/// Number of attempts still waiting for a callback.
	pub fn pending(&self) -> usize {
		self.0.read().len()
	}

	/// Drops every attempt that expired at `now`, returning how many were removed.
	pub fn purge_expired(&self, now: OffsetDateTime) -> usize {
		let mut guard = self.0.write();
		let before = guard.len();

		guard.retain(|_, attempt| !attempt.is_expired_at(now));

		before - guard.len()
	}

	fn resolve_now(
		map: AttemptMap,
		state: &str,
		now: OffsetDateTime,
	) -> Result<AuthenticationAttempt, SessionResolutionFailure> {
		if state.is_empty() {
			return Err(SessionRejection::MissingState.into());
		}

		let attempt = map.write().remove(state).ok_or(SessionRejection::UnknownState)?;

		if attempt.is_expired_at(now) {
			return Err(SessionRejection::Expired.into());
		}

		Ok(attempt)
	}
}
impl AuthenticationSessionRegistry for MemorySessionRegistry {
	fn resolve<'a>(&'a self, state: &'a str) -> SessionFuture<'a, AuthenticationAttempt> {
		let map = self.0.clone();

		Box::pin(async move { Self::resolve_now(map, state, OffsetDateTime::now_utc()) })
	}
}

fn random_string(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{ProviderId, RealmId, RelyingPartyId};

	fn attempt() -> AuthenticationAttempt {
		AuthenticationAttempt::new(
			RealmId::new("demo").expect("Realm fixture should be valid."),
			RelyingPartyId::new("web").expect("Relying party fixture should be valid."),
			ProviderId::new("vk").expect("Provider fixture should be valid."),
		)
	}

	#[tokio::test]
	async fn resolution_consumes_the_attempt() {
		let registry = MemorySessionRegistry::default();
		let state = registry.open(attempt());

		assert_eq!(state.len(), STATE_LEN);
		assert_eq!(registry.pending(), 1);

		let resolved = registry.resolve(&state).await.expect("First resolution should succeed.");

		assert_eq!(resolved.provider.as_ref(), "vk");
		assert_eq!(registry.pending(), 0);

		let replay = registry.resolve(&state).await.expect_err("Replay should be rejected.");

		assert_eq!(replay.rejection, SessionRejection::UnknownState);
	}

	#[tokio::test]
	async fn empty_and_expired_states_are_rejected() {
		let registry = MemorySessionRegistry::default();
		let err = registry.resolve("").await.expect_err("Empty state should be rejected.");

		assert_eq!(err.rejection, SessionRejection::MissingState);

		registry.insert("S-expired", attempt().with_ttl(Duration::ZERO));

		let err = registry.resolve("S-expired").await.expect_err("Expired state should fail.");

		assert_eq!(err.rejection, SessionRejection::Expired);
		assert_eq!(registry.pending(), 0, "Expired attempts are consumed as well.");
	}

	#[test]
	fn purge_drops_only_expired_attempts() {
		let registry = MemorySessionRegistry::default();

		registry.insert("live", attempt());
		registry.insert("dead", attempt().with_ttl(Duration::ZERO));

		assert_eq!(registry.purge_expired(OffsetDateTime::now_utc()), 1);
		assert_eq!(registry.pending(), 1);
	}
}
