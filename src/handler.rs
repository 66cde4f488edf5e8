//! OAuth handshake handler: state issuance, callback validation, and token exchange.
//!
//! One invocation runs exactly one of two branches. Without a `state` query parameter the
//! handler issues a fresh CSRF state token, caches it with a short TTL, and redirects the
//! caller to the provider's authorization endpoint. With a `state` it validates the token
//! against the cache, exchanges the authorization code for an access token using the
//! confidential client secret, and forwards the raw token-endpoint body. Each invocation
//! is stateless; the expiring cache shared with peer invocations is the only durable
//! state, and no failure is ever retried.

// crates.io
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	cache::StateCache,
	config::{HandshakeConfig, ResponseMode},
	http::TokenHttpClient,
	obs::{self, HandshakeBranch, HandshakeOutcome, HandshakeSpan},
	secret::SecretStore,
	token::TokenResponse,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTokenClient;

/// Query parameter carrying the CSRF state token.
pub const STATE_PARAM: &str = "state";
/// Query parameter carrying the provider-issued authorization code.
pub const CODE_PARAM: &str = "code";

/// `Location` header name.
pub const LOCATION_HEADER: &str = "Location";
/// `Set-Cookie` header name.
pub const SET_COOKIE_HEADER: &str = "Set-Cookie";

/// Inbound request abstraction; the handler only ever reads query parameters.
#[derive(Clone, Debug, Default)]
pub struct HandshakeRequest {
	query: HashMap<String, String>,
}
impl HandshakeRequest {
	/// Creates a request from pre-parsed query parameters.
	pub fn new(query: HashMap<String, String>) -> Self {
		Self { query }
	}

	/// Creates a request from query key/value pairs.
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self::new(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}

	/// Returns the query parameter `name`, if present.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.query.get(name).map(String::as_str)
	}

	// An empty parameter is treated exactly like an absent one.
	fn non_empty_param(&self, name: &str) -> Option<&str> {
		self.param(name).filter(|value| !value.is_empty())
	}
}

/// Terminal reply produced by one handshake invocation.
#[derive(Clone, Debug)]
pub struct HandshakeResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: BTreeMap<String, String>,
	/// Plain response body.
	pub body: String,
}
impl HandshakeResponse {
	fn ok(body: String) -> Self {
		Self { status: 200, headers: BTreeMap::new(), body }
	}

	fn redirect(status: u16, location: String, cookie: String, body: String) -> Self {
		let mut headers = BTreeMap::new();

		headers.insert(LOCATION_HEADER.to_owned(), location);
		headers.insert(SET_COOKIE_HEADER.to_owned(), cookie);

		Self { status, headers, body }
	}

	fn failure(error: &Error) -> Self {
		Self { status: error.status(), headers: BTreeMap::new(), body: error.detail() }
	}

	/// Returns the header `name`, if set.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).map(String::as_str)
	}
}

#[cfg(feature = "reqwest")]
/// Handshake handler specialized for the crate's default reqwest transport.
pub type ReqwestHandshake = Handshake<ReqwestTokenClient>;

/// Completes the CSRF-state OAuth handshake behind a serverless endpoint.
///
/// The handler owns the transport, the expiring state cache, the secret store, and the
/// validated configuration so [`Handshake::handle`] can stay a pure request-to-reply
/// mapping. Failures never escape as `Err`; every error becomes a terminal plain-text
/// reply with the status assigned by [`Error::status`].
#[derive(Clone)]
pub struct Handshake<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Transport used for the server-to-server token exchange.
	pub http_client: Arc<C>,
	/// Expiring cache holding issued state tokens.
	pub cache: Arc<dyn StateCache>,
	/// Secret store resolving the confidential client secret.
	pub secrets: Arc<dyn SecretStore>,
	/// Endpoint, credential, and response-mode configuration.
	pub config: HandshakeConfig,
}
impl<C> Handshake<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a handler that reuses the caller-provided transport.
	pub fn with_http_client(
		cache: Arc<dyn StateCache>,
		secrets: Arc<dyn SecretStore>,
		config: HandshakeConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), cache, secrets, config }
	}

	/// Runs one handshake invocation and maps every failure onto a terminal reply.
	pub async fn handle(&self, request: &HandshakeRequest) -> HandshakeResponse {
		let (branch, result) = match request.non_empty_param(STATE_PARAM) {
			None => {
				const BRANCH: HandshakeBranch = HandshakeBranch::Initiate;

				let span = HandshakeSpan::new(BRANCH, "handle");

				obs::record_handshake_outcome(BRANCH, HandshakeOutcome::Attempt);

				(BRANCH, span.instrument(self.initiate()).await)
			},
			Some(state) => {
				const BRANCH: HandshakeBranch = HandshakeBranch::Callback;

				let span = HandshakeSpan::new(BRANCH, "handle");

				obs::record_handshake_outcome(BRANCH, HandshakeOutcome::Attempt);

				(BRANCH, span.instrument(self.callback(state, request.non_empty_param(CODE_PARAM))).await)
			},
		};

		match result {
			Ok(response) => {
				obs::record_handshake_outcome(branch, HandshakeOutcome::Success);

				response
			},
			Err(error) => {
				obs::record_handshake_outcome(branch, HandshakeOutcome::Failure);

				HandshakeResponse::failure(&error)
			},
		}
	}

	/// Branch A: issue a fresh state token and redirect the caller to the provider.
	async fn initiate(&self) -> Result<HandshakeResponse> {
		let state = Uuid::new_v4().to_string();

		self.cache.put(&state, self.config.state_ttl).await.map_err(Error::CacheWrite)?;

		let location = build_authorize_url(&self.config, &state);

		Ok(HandshakeResponse::redirect(
			302,
			location.to_string(),
			format!("state={state};"),
			String::new(),
		))
	}

	/// Branch B: validate the returned state, then exchange the authorization code.
	async fn callback(&self, state: &str, code: Option<&str>) -> Result<HandshakeResponse> {
		let known = self.cache.contains(state).await.map_err(|source| Error::UnknownState {
			state: state.to_owned(),
			source: Some(source),
		})?;

		if !known {
			return Err(Error::UnknownState { state: state.to_owned(), source: None });
		}

		let code = code.ok_or(Error::MissingAuthorizationCode)?;
		let secret =
			self.secrets.fetch(&self.config.secret_name).await.map_err(|source| {
				Error::SecretRetrieval { name: self.config.secret_name.clone(), source }
			})?;
		let form = [
			("code", code.to_owned()),
			("client_id", self.config.client_id.clone()),
			("client_secret", secret.expose().to_owned()),
			("grant_type", "authorization_code".to_owned()),
			("redirect_uri", self.config.redirect_uri.to_string()),
		];
		let reply = self.http_client.post_form(&self.config.token_endpoint, &form).await?;
		// Shape validation only; the original wire body is forwarded, never re-serialized.
		let token = TokenResponse::parse(&reply.body).map_err(Error::ResponseParse)?;

		match &self.config.response_mode {
			ResponseMode::Body => Ok(HandshakeResponse::ok(reply.body)),
			ResponseMode::Redirect { destination } => Ok(HandshakeResponse::redirect(
				301,
				destination.to_string(),
				format!("token={};", token.access_token),
				reply.body,
			)),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Handshake<ReqwestTokenClient> {
	/// Creates a handler with the crate's default reqwest-backed transport.
	pub fn new(
		cache: Arc<dyn StateCache>,
		secrets: Arc<dyn SecretStore>,
		config: HandshakeConfig,
	) -> Self {
		Self::with_http_client(cache, secrets, config, ReqwestTokenClient::default())
	}
}
impl<C> Debug for Handshake<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Handshake").field("config", &self.config).finish()
	}
}

/// Builds the provider authorization URL carrying the freshly issued state.
fn build_authorize_url(config: &HandshakeConfig, state: &str) -> Url {
	let mut url = config.authorization_endpoint.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("client_id", &config.client_id);
	pairs.append_pair("redirect_uri", config.redirect_uri.as_str());

	if let Some(scope) = config.scope_value() {
		pairs.append_pair("scope", &scope);
	}

	pairs.append_pair("response_type", "code");
	pairs.append_pair(STATE_PARAM, state);

	drop(pairs);

	url
}
