// self
use oauth2_social_broker::{
	_preludet::*,
	auth::TokenSecret,
	error::{Error, TokenEndpointError, TransportError},
	exchange::{
		TokenExchangeClient, TransportErrorMapper,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode},
	},
	http::TokenHttpClient,
};

#[derive(Debug)]
enum FakeTransportError {
	TimedOut,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::TimedOut => write!(f, "Transport timed out."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Copy, Debug)]
enum Script {
	Respond(u16, &'static str),
	Fail,
}

/// Captures every request and answers from a fixed script.
#[derive(Clone)]
struct FakeHttpClient {
	script: Script,
	captured: Arc<Mutex<Vec<HttpRequest>>>,
}
impl FakeHttpClient {
	fn new(script: Script) -> Self {
		Self { script, captured: Default::default() }
	}

	fn captured_forms(&self) -> Vec<BTreeMap<String, String>> {
		self.captured
			.lock()
			.iter()
			.map(|request| url::form_urlencoded::parse(request.body()).into_owned().collect())
			.collect()
	}
}
impl TokenHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self) -> Self::Handle {
		FakeHttpHandle { script: self.script, captured: self.captured.clone() }
	}
}

struct FakeHttpHandle {
	script: Script,
	captured: Arc<Mutex<Vec<HttpRequest>>>,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let script = self.script;
		let captured = self.captured.clone();

		Box::pin(async move {
			captured.lock().push(request);

			match script {
				Script::Respond(status, body) => {
					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Scripted status should be valid.");

					Ok(response)
				},
				Script::Fail =>
					Err(HttpClientError::Reqwest(Box::new(FakeTransportError::TimedOut))),
			}
		})
	}
}

#[derive(Clone, Copy, Default)]
struct TimeoutMapper;
impl TransportErrorMapper<FakeTransportError> for TimeoutMapper {
	fn map_transport_error(&self, error: HttpClientError<FakeTransportError>) -> Error {
		match error {
			HttpClientError::Reqwest(inner) => TransportError::timeout(*inner).into(),
			other => TransportError::Other { message: other.to_string() }.into(),
		}
	}
}

type FakeExchangeClient = TokenExchangeClient<FakeHttpClient, TimeoutMapper>;

fn exchange_client(http_client: FakeHttpClient) -> FakeExchangeClient {
	TokenExchangeClient::new(http_client, TimeoutMapper)
}

async fn exchange(client: &FakeExchangeClient) -> Result<String, Error> {
	let token_url =
		Url::parse("https://oauth.example.com/access_token").expect("Token URL should parse.");
	let redirect_uri = Url::parse("https://sso.example.com/realms/demo/broker/vk/endpoint")
		.expect("Redirect URI should parse.");

	client
		.exchange("ABC123", &token_url, "client-it", &TokenSecret::new("secret-it"), &redirect_uri)
		.await
		.map(|response| response.as_str().to_owned())
}

#[tokio::test]
async fn exchange_posts_one_form_and_returns_the_raw_body() {
	let http_client = FakeHttpClient::new(Script::Respond(200, "{\"access_token\":\"at\"}"));
	let client = exchange_client(http_client.clone());
	let body = exchange(&client).await.expect("Exchange should succeed.");

	assert_eq!(body, "{\"access_token\":\"at\"}");

	let forms = http_client.captured_forms();

	assert_eq!(forms.len(), 1, "The exchange never retries.");
	assert_eq!(forms[0]["code"], "ABC123");
	assert_eq!(forms[0]["client_id"], "client-it");
	assert_eq!(forms[0]["client_secret"], "secret-it");
	assert_eq!(forms[0]["redirect_uri"], "https://sso.example.com/realms/demo/broker/vk/endpoint");
	assert_eq!(forms[0]["grant_type"], "authorization_code");

	let captured = http_client.captured.lock();

	assert_eq!(captured[0].uri(), "https://oauth.example.com/access_token");
	assert_eq!(
		captured[0].headers().get("content-type").and_then(|value| value.to_str().ok()),
		Some("application/x-www-form-urlencoded")
	);
}

#[tokio::test]
async fn transport_failures_are_mapped_without_retry() {
	let http_client = FakeHttpClient::new(Script::Fail);
	let client = exchange_client(http_client.clone());
	let err = exchange(&client).await.expect_err("Transport failure should surface.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })));
	assert_eq!(http_client.captured.lock().len(), 1);
}

#[tokio::test]
async fn non_success_statuses_carry_a_body_preview() {
	let client = exchange_client(FakeHttpClient::new(Script::Respond(
		401,
		"{\"error\":\"invalid_client\"}",
	)));
	let err = exchange(&client).await.expect_err("HTTP 401 should fail the exchange.");

	match err {
		Error::TokenEndpoint(TokenEndpointError::Status { status, body_preview }) => {
			assert_eq!(status, 401);
			assert_eq!(body_preview, "{\"error\":\"invalid_client\"}");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
}
