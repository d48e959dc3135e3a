//! Redirect parameters and the per-request context carried through a callback.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, session::AuthenticationAttempt};

/// Error code a provider sends when the user declined the consent screen.
pub const ACCESS_DENIED: &str = "access_denied";

/// Redirect parameters received on the callback endpoint.
///
/// Empty `code` and `error` values are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackRequest {
	/// Opaque state token issued at login initiation.
	pub state: String,
	/// Authorization code, when the provider granted access.
	pub code: Option<String>,
	/// Provider-supplied error code.
	pub error: Option<String>,
}
impl CallbackRequest {
	/// Creates a request carrying only the state token.
	pub fn new(state: impl Into<String>) -> Self {
		Self { state: state.into(), ..Default::default() }
	}

	/// Attaches an authorization code.
	pub fn with_code(mut self, code: impl Into<String>) -> Self {
		self.code = non_empty(code.into());

		self
	}

	/// Attaches a provider error code.
	pub fn with_error(mut self, error: impl Into<String>) -> Self {
		self.error = non_empty(error.into());

		self
	}

	/// Parses the redirect parameters from the full callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::from_query(url.query().unwrap_or_default())
	}

	/// Parses the redirect parameters from a raw query string.
	///
	/// The first occurrence of each parameter wins; unknown parameters are ignored.
	pub fn from_query(query: &str) -> Self {
		let mut state = None;
		let mut code = None;
		let mut error = None;

		for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
			let slot = match &*key {
				"state" => &mut state,
				"code" => &mut code,
				"error" => &mut error,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		Self {
			state: state.unwrap_or_default(),
			code: code.and_then(non_empty),
			error: error.and_then(non_empty),
		}
	}

	/// Returns true when the provider reported a user cancellation.
	pub fn is_cancellation(&self) -> bool {
		self.error.as_deref() == Some(ACCESS_DENIED)
	}
}

/// Per-request context shared with downstream components.
///
/// The state machine binds the resolved [`AuthenticationAttempt`] here so the hosting
/// application can reach realm and client configuration once the callback returns.
#[derive(Clone, Debug)]
pub struct RequestContext {
	callback_url: Url,
	attempt: Option<AuthenticationAttempt>,
}
impl RequestContext {
	/// Creates a context for a request received at `callback_url`.
	pub fn new(callback_url: Url) -> Self {
		Self { callback_url, attempt: None }
	}

	/// Absolute URL the request was received at, query included.
	pub fn callback_url(&self) -> &Url {
		&self.callback_url
	}

	/// Redirect URI sent to the token endpoint: the callback URL without query or fragment.
	pub fn redirect_uri(&self) -> Url {
		let mut url = self.callback_url.clone();

		url.set_query(None);
		url.set_fragment(None);

		url
	}

	/// Attempt bound to this request, once the session was resolved.
	pub fn attempt(&self) -> Option<&AuthenticationAttempt> {
		self.attempt.as_ref()
	}

	/// Binds the resolved attempt for the remainder of the request.
	pub fn bind(&mut self, attempt: AuthenticationAttempt) {
		self.attempt = Some(attempt);
	}
}

fn non_empty(value: String) -> Option<String> {
	if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn from_url_reads_redirect_parameters() {
		let url = Url::parse(
			"https://sso.example.com/realms/demo/broker/vk/endpoint?state=S1&code=ABC123&extra=1",
		)
		.expect("Callback URL should parse.");
		let request = CallbackRequest::from_url(&url);

		assert_eq!(request.state, "S1");
		assert_eq!(request.code.as_deref(), Some("ABC123"));
		assert_eq!(request.error, None);
		assert!(!request.is_cancellation());
	}

	#[test]
	fn from_query_keeps_first_occurrence_and_drops_empty_values() {
		let request = CallbackRequest::from_query("?state=S1&state=S2&code=&error=access_denied");

		assert_eq!(request.state, "S1");
		assert_eq!(request.code, None);
		assert!(request.is_cancellation());
		assert_eq!(CallbackRequest::from_query("").state, "");
	}

	#[test]
	fn redirect_uri_strips_query_and_fragment() {
		let mut ctx = RequestContext::new(
			Url::parse("https://sso.example.com/broker/vk/endpoint?state=S1&code=X#frag")
				.expect("Callback URL should parse."),
		);

		assert_eq!(ctx.redirect_uri().as_str(), "https://sso.example.com/broker/vk/endpoint");
		assert!(ctx.attempt().is_none());

		ctx.bind(crate::_preludet::attempt_fixture("vk"));

		assert_eq!(ctx.attempt().map(|attempt| attempt.provider.as_ref()), Some("vk"));
	}
}
