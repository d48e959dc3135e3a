//! Social login callbacks for OAuth 2.0 providers: validate the redirect, exchange the
//! authorization code, and normalize the provider profile into one federated identity.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod audit;
pub mod auth;
pub mod callback;
pub mod error;
pub mod exchange;
pub mod http;
pub mod obs;
pub mod provider;
pub mod reply;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ProviderId, RealmId, RelyingPartyId},
		session::AuthenticationAttempt,
	};
	#[cfg(feature = "reqwest")]
	use crate::{
		audit::MemoryAuditSink,
		callback::{GatewayReporter, ReqwestCallbackBroker},
		exchange::ReqwestTransportErrorMapper,
		http::ReqwestHttpClient,
		provider::{IdentityMapper, ProviderConfig},
		session::MemorySessionRegistry,
	};

	/// Builds an attempt for realm `demo`, client `web`, and the given provider.
	pub fn attempt_fixture(provider: &str) -> AuthenticationAttempt {
		AuthenticationAttempt::new(
			RealmId::new("demo").expect("Realm fixture should be valid."),
			RelyingPartyId::new("web").expect("Relying party fixture should be valid."),
			ProviderId::new(provider).expect("Provider fixture should be valid."),
		)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	#[cfg(feature = "reqwest")]
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`ReqwestCallbackBroker`] backed by the in-memory session registry, a
	/// [`GatewayReporter`] writing into a [`MemoryAuditSink`], and the test transport.
	#[cfg(feature = "reqwest")]
	pub fn build_reqwest_test_broker(
		config: ProviderConfig,
		mapper: Arc<dyn IdentityMapper>,
	) -> (ReqwestCallbackBroker, Arc<MemorySessionRegistry>, MemoryAuditSink) {
		let sessions = Arc::new(MemorySessionRegistry::default());
		let audit = MemoryAuditSink::default();
		let reporter = Arc::new(GatewayReporter::new(Arc::new(audit.clone())));
		let broker = ReqwestCallbackBroker::with_http_client(
			config,
			mapper,
			sessions.clone(),
			reporter,
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		);

		(broker, sessions, audit)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
