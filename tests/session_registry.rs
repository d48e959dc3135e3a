// self
use oauth2_social_broker::{
	_preludet::*,
	session::{AuthenticationSessionRegistry, MemorySessionRegistry, SessionRejection},
};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolution_of_one_state_succeeds_once() {
	let registry = Arc::new(MemorySessionRegistry::default());
	let state = registry.open(attempt_fixture("vk"));
	let tasks = (0..8)
		.map(|_| {
			let registry = registry.clone();
			let state = state.clone();

			tokio::spawn(async move { registry.resolve(&state).await.map_err(|f| f.rejection) })
		})
		.collect::<Vec<_>>();
	let mut successes = 0;

	for task in tasks {
		match task.await.expect("Resolution task should not panic.") {
			Ok(attempt) => {
				assert_eq!(attempt.provider.as_ref(), "vk");

				successes += 1;
			},
			Err(rejection) => assert_eq!(rejection, SessionRejection::UnknownState),
		}
	}

	assert_eq!(successes, 1);
	assert_eq!(registry.pending(), 0);
}

#[tokio::test]
async fn independent_states_resolve_independently() {
	let registry = MemorySessionRegistry::default();
	let first = registry.open(attempt_fixture("vk"));
	let second = registry.open(attempt_fixture("github"));

	assert_ne!(first, second);

	let resolved = registry.resolve(&second).await.expect("Second state should resolve.");

	assert_eq!(resolved.provider.as_ref(), "github");
	assert_eq!(registry.pending(), 1);
	assert!(registry.resolve(&first).await.is_ok());
}

#[tokio::test]
async fn expired_attempts_render_the_expired_page() {
	let registry = MemorySessionRegistry::default();

	registry.insert("stale", attempt_fixture("vk").with_ttl(Duration::seconds(-1)));

	let failure = registry.resolve("stale").await.expect_err("Expired state should fail.");

	assert_eq!(failure.rejection, SessionRejection::Expired);
	assert_eq!(failure.page.status.as_u16(), 400);
	assert_eq!(
		failure.into_reply().error_page().map(|page| page.message.key()),
		Some("expiredLoginSessionMessage")
	);
}
