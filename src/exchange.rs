//! Authorization-code-for-token exchange against a provider's token endpoint.
//!
//! One form POST, no parsing, no retry. The raw body goes to the provider's
//! [`IdentityMapper`](crate::provider::IdentityMapper), since social networks often embed
//! profile data (e.g. the email address) next to the token.

pub use oauth2;

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{
		Method,
		header::{ACCEPT, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
#[cfg(feature = "reqwest")] use crate::error::TransportError;
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, TokenEndpointError},
	http::TokenHttpClient,
};

/// Grant type sent with every exchange.
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";

const BODY_PREVIEW_LIMIT: usize = 256;

/// Maps HTTP transport failures into broker [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a broker error.
	fn map_transport_error(&self, error: HttpClientError<E>) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, err: HttpClientError<ReqwestError>) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(*inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) => TransportError::Other { message }.into(),
			_ =>
				TransportError::Other { message: "unrecognized HTTP client failure".into() }.into(),
		}
	}
}

/// Raw token endpoint response, handed once to the identity mapper.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenResponse {
	status: u16,
	body: String,
}
impl TokenResponse {
	/// Wraps a response body received with the given HTTP status.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// HTTP status the body was received with.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Raw response body.
	pub fn as_str(&self) -> &str {
		&self.body
	}

	/// Moves the raw body into a [`TokenSecret`] for storage on an identity.
	pub fn into_secret(self) -> TokenSecret {
		TokenSecret::new(self.body)
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("status", &self.status)
			.field("body_len", &self.body.len())
			.finish()
	}
}

/// Performs the authorization code exchange over a [`TokenHttpClient`].
pub struct TokenExchangeClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> TokenExchangeClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an exchange client over the provided transport + mapper pair.
	pub fn new(http_client: impl Into<Arc<C>>, error_mapper: impl Into<Arc<M>>) -> Self {
		Self { http_client: http_client.into(), error_mapper: error_mapper.into() }
	}

	/// Exchanges `code` at `token_url` and returns the raw response body.
	///
	/// `redirect_uri` must be the exact callback URL registered with the provider. Transport
	/// failures, timeouts, and non-2xx statuses are returned as errors without retrying,
	/// since a retry would need a fresh authorization code.
	pub async fn exchange(
		&self,
		code: &str,
		token_url: &Url,
		client_id: &str,
		client_secret: &TokenSecret,
		redirect_uri: &Url,
	) -> Result<TokenResponse> {
		let request = build_request(code, token_url, client_id, client_secret, redirect_uri)?;
		let handle = self.http_client.handle();
		let response = handle
			.call(request)
			.await
			.map_err(|err| self.error_mapper.map_transport_error(err))?;
		let status = response.status().as_u16();
		let body = String::from_utf8(response.into_body())
			.map_err(|source| TokenEndpointError::NonUtf8Body { status, source })?;

		if !(200..300).contains(&status) {
			return Err(
				TokenEndpointError::Status { status, body_preview: truncate_preview(&body) }.into()
			);
		}

		Ok(TokenResponse::new(status, body))
	}
}
impl<C, M> Clone for TokenExchangeClient<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			error_mapper: Arc::clone(&self.error_mapper),
		}
	}
}

fn build_request(
	code: &str,
	token_url: &Url,
	client_id: &str,
	client_secret: &TokenSecret,
	redirect_uri: &Url,
) -> Result<HttpRequest> {
	let form = Serializer::new(String::new())
		.append_pair("code", code)
		.append_pair("client_id", client_id)
		.append_pair("client_secret", client_secret.expose())
		.append_pair("redirect_uri", redirect_uri.as_str())
		.append_pair("grant_type", GRANT_TYPE_AUTHORIZATION_CODE)
		.finish();

	oauth2::http::Request::builder()
		.method(Method::POST)
		.uri(token_url.as_str())
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
		.header(ACCEPT, "application/json")
		.body(form.into_bytes())
		.map_err(|err| ConfigError::from(err).into())
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::from(err).into()
}

fn truncate_preview(body: &str) -> String {
	if body.chars().count() <= BODY_PREVIEW_LIMIT {
		return body.to_owned();
	}

	let mut buf: String = body.chars().take(BODY_PREVIEW_LIMIT).collect();

	buf.push('…');

	buf
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_carries_all_five_form_parameters() {
		let request = build_request(
			"ABC123",
			&Url::parse("https://oauth.example.com/token").expect("Token URL should parse."),
			"client",
			&TokenSecret::new("s3cr3t"),
			&Url::parse("https://sso.example.com/realms/demo/broker/vk/endpoint")
				.expect("Redirect URL should parse."),
		)
		.expect("Request should build.");
		let form: BTreeMap<String, String> =
			url::form_urlencoded::parse(request.body()).into_owned().collect();

		assert_eq!(*request.method(), Method::POST);
		assert_eq!(request.uri(), "https://oauth.example.com/token");
		assert_eq!(form.len(), 5);
		assert_eq!(form["code"], "ABC123");
		assert_eq!(form["client_id"], "client");
		assert_eq!(form["client_secret"], "s3cr3t");
		assert_eq!(form["redirect_uri"], "https://sso.example.com/realms/demo/broker/vk/endpoint");
		assert_eq!(form["grant_type"], "authorization_code");
	}

	#[test]
	fn preview_truncates_long_bodies() {
		let long = "x".repeat(BODY_PREVIEW_LIMIT + 10);
		let preview = truncate_preview(&long);

		assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 1);
		assert!(preview.ends_with('…'));
		assert_eq!(truncate_preview("short"), "short");
	}

	#[test]
	fn token_response_debug_hides_body() {
		let response = TokenResponse::new(200, "{\"access_token\":\"secret\"}");

		assert!(!format!("{response:?}").contains("secret"));
		assert_eq!(response.status(), 200);
		assert_eq!(response.into_secret().expose(), "{\"access_token\":\"secret\"}");
	}
}
