//! Callback state machine: validates the provider redirect, exchanges the code, maps the
//! identity, and classifies every failure into an [`Outcome`].
//!
//! One invocation runs `Received -> SessionValidated -> TokenExchanged -> IdentityMapped`
//! to completion and keeps nothing across requests. Provider errors short-circuit before
//! the session lookup, session failures bypass the taxonomy with their own reply, and every
//! other failure is folded into an [`Outcome`] by [`Outcome::from_error`].

pub mod outcome;
pub mod report;
pub mod request;

pub use outcome::*;
pub use report::*;
pub use request::*;

// std
use std::panic::{self, AssertUnwindSafe};
// self
use crate::{
	_prelude::*,
	auth::FederatedIdentity,
	exchange::{TokenExchangeClient, TransportErrorMapper},
	http::TokenHttpClient,
	obs::{self, CallbackSpan, OutcomeLabel, log_event},
	provider::{IdentityMapper, MappingError, ProviderConfig},
	reply::Reply,
	session::{
		AuthenticationAttempt, AuthenticationSessionRegistry, SessionRejection,
		SessionResolutionFailure,
	},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, exchange::ReqwestTransportErrorMapper, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Callback broker specialized for the crate's default reqwest transport stack.
pub type ReqwestCallbackBroker = CallbackBroker<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Handles social login callbacks for a single provider.
///
/// Provider specifics are injected rather than inherited: the [`ProviderConfig`] carries the
/// token endpoint and client credentials, and the [`IdentityMapper`] parses the provider's
/// token response. The session registry and outcome reporter are the hosting application's
/// collaborators.
pub struct CallbackBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Provider configuration used for the exchange and attached to every identity.
	pub config: Arc<ProviderConfig>,
	/// Provider-specific identity mapper.
	pub mapper: Arc<dyn IdentityMapper>,
	/// Registry resolving state tokens into attempts.
	pub sessions: Arc<dyn AuthenticationSessionRegistry>,
	/// Reporter used by [`CallbackBroker::respond`].
	pub reporter: Arc<dyn OutcomeReporter>,
	/// Token exchange client.
	pub exchange: TokenExchangeClient<C, M>,
}
impl<C, M> CallbackBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a broker that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: impl Into<Arc<ProviderConfig>>,
		mapper: Arc<dyn IdentityMapper>,
		sessions: Arc<dyn AuthenticationSessionRegistry>,
		reporter: Arc<dyn OutcomeReporter>,
		http_client: impl Into<Arc<C>>,
		transport_mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			config: config.into(),
			mapper,
			sessions,
			reporter,
			exchange: TokenExchangeClient::new(http_client, transport_mapper),
		}
	}

	/// Runs the state machine for one redirect.
	///
	/// Returns `Err` only when the session registry rejected the state (or the attempt
	/// belongs to another provider); the failure carries its own reply and must be returned
	/// to the user verbatim. Every other path yields exactly one [`Outcome`].
	pub async fn handle_callback(
		&self,
		ctx: &mut RequestContext,
		request: CallbackRequest,
	) -> Result<Outcome, SessionResolutionFailure> {
		let span = CallbackSpan::new(&self.config.id, "handle_callback");

		obs::record_callback_outcome(OutcomeLabel::Attempt);

		let result = span.instrument(self.drive(ctx, request)).await;

		match &result {
			Ok(outcome) => obs::record_callback_outcome(outcome.label()),
			Err(_) => obs::record_callback_outcome(OutcomeLabel::SessionRejected),
		}

		result
	}

	/// Runs [`Self::handle_callback`] and turns the result into a [`Reply`].
	///
	/// Outcomes go through the configured [`OutcomeReporter`]; session failures return their
	/// own reply without touching the reporter.
	pub async fn respond(&self, ctx: &mut RequestContext, request: CallbackRequest) -> Reply {
		match self.handle_callback(ctx, request).await {
			Ok(outcome) => {
				let scope = ReportScope { provider: &self.config.id, attempt: ctx.attempt() };

				self.reporter.report(scope, outcome)
			},
			Err(failure) => failure.into_reply(),
		}
	}

	async fn drive(
		&self,
		ctx: &mut RequestContext,
		request: CallbackRequest,
	) -> Result<Outcome, SessionResolutionFailure> {
		let provider = &self.config.id;

		log_event!(
			debug,
			%provider,
			state = request.state.as_str(),
			has_code = request.code.is_some(),
			error = request.error.as_deref(),
			"Callback received."
		);

		if let Some(error) = request.error.as_deref() {
			if request.is_cancellation() {
				log_event!(info, %provider, "User cancelled the login at the identity provider.");

				return Ok(Outcome::Cancelled);
			}

			log_event!(error, %provider, error, "Identity provider redirected back with an error.");

			return Ok(Outcome::UpstreamError(error.to_owned()));
		}

		let attempt = match self.sessions.resolve(&request.state).await {
			Ok(attempt) => attempt,
			Err(failure) => {
				log_event!(warn, %provider, rejection = %failure.rejection, "Session rejected.");

				return Err(failure);
			},
		};

		if attempt.provider != *provider {
			let rejection = SessionRejection::ProviderMismatch {
				expected: attempt.provider,
				actual: provider.clone(),
			};

			log_event!(warn, %provider, %rejection, "Session rejected.");

			return Err(rejection.into());
		}

		log_event!(
			debug,
			%provider,
			realm = %attempt.realm,
			client = %attempt.client,
			"Authentication session bound."
		);

		ctx.bind(attempt.clone());

		match self.complete(ctx, request.code.as_deref(), attempt).await {
			Ok(identity) => {
				log_event!(info, %provider, "Federated identity produced.");

				Ok(Outcome::Success(Box::new(identity)))
			},
			Err(err) => {
				let outcome = Outcome::from_error(&err);

				log_event!(
					error,
					%provider,
					outcome = %outcome.label(),
					error = %err,
					"Callback failed."
				);

				Ok(outcome)
			},
		}
	}

	/// Exchanges the code and maps the provider response into a finalized identity.
	///
	/// The raw response is logged in full at `debug` only; `info` carries its status and
	/// length so tokens stay out of default log output. A panicking mapper surfaces as
	/// [`MappingError::Other`] and therefore as [`Outcome::InternalError`].
	async fn complete(
		&self,
		ctx: &RequestContext,
		code: Option<&str>,
		attempt: AuthenticationAttempt,
	) -> Result<FederatedIdentity> {
		let code = code.ok_or(Error::MissingAuthorizationCode)?;
		let config = &self.config;
		let response = self
			.exchange
			.exchange(
				code,
				&config.token_endpoint,
				&config.client_id,
				&config.client_secret,
				&ctx.redirect_uri(),
			)
			.await?;

		log_event!(
			info,
			provider = %config.id,
			status = response.status(),
			body_len = response.as_str().len(),
			"Token response received."
		);
		log_event!(debug, provider = %config.id, body = response.as_str(), "Raw token response.");

		let mapped = panic::catch_unwind(AssertUnwindSafe(|| self.mapper.map_identity(&response)))
			.map_err(|_| MappingError::Other { message: "identity mapper panicked".into() })?;
		let mut profile = mapped?;

		if config.store_token && profile.token.is_none() {
			profile.token = Some(response.into_secret());
		}

		Ok(FederatedIdentity::finalize(profile, config.clone(), self.mapper.kind(), attempt))
	}
}
#[cfg(feature = "reqwest")]
impl CallbackBroker<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a broker that provisions its own reqwest transport.
	///
	/// The configuration is validated first, since deserialized values skip the builder.
	pub fn new(
		config: ProviderConfig,
		mapper: Arc<dyn IdentityMapper>,
		sessions: Arc<dyn AuthenticationSessionRegistry>,
		reporter: Arc<dyn OutcomeReporter>,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self::with_http_client(
			config,
			mapper,
			sessions,
			reporter,
			ReqwestHttpClient::new()?,
			ReqwestTransportErrorMapper,
		))
	}
}
impl<C, M> Clone for CallbackBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			config: Arc::clone(&self.config),
			mapper: Arc::clone(&self.mapper),
			sessions: Arc::clone(&self.sessions),
			reporter: Arc::clone(&self.reporter),
			exchange: self.exchange.clone(),
		}
	}
}
impl<C, M> Debug for CallbackBroker<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackBroker")
			.field("config", &self.config)
			.field("mapper", &self.mapper.kind())
			.finish()
	}
}
