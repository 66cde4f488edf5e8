//! Transport primitives for the server-to-server token exchange.
//!
//! The module exposes [`TokenHttpClient`], the handler's only dependency on an HTTP
//! stack. Implementations submit one form-encoded POST per invocation and must keep the
//! three failure sites distinguishable—request assembly, dispatch, and body read—so the
//! handler can surface each as its own terminal error.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
// self
use crate::{_prelude::*, error::ExchangeError};

/// Content type used for every token-exchange POST.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Upper bound on one exchange round-trip. The source relied on the platform's
/// connection handling; a fixed bound is the documented improvement here.
#[cfg(feature = "reqwest")]
const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Raw reply captured from the token endpoint.
///
/// The body is kept verbatim; the handler forwards it untouched after shape validation.
#[derive(Clone, Debug)]
pub struct TokenEndpointResponse {
	/// HTTP status code returned by the token endpoint.
	pub status: u16,
	/// Full reply body, exactly as received on the wire.
	pub body: String,
}

/// Boxed future returned by [`TokenHttpClient::post_form`].
pub type ExchangeFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenEndpointResponse, ExchangeError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing the token exchange.
///
/// Implementations must be `Send + Sync + 'static` so one client can be shared across
/// concurrent invocations without additional wrappers. No retries: a failed call is
/// surfaced immediately.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Submits `form` to `endpoint` as an urlencoded POST and reads the full reply body.
	fn post_form<'a>(
		&'a self,
		endpoint: &'a Url,
		form: &'a [(&'static str, String)],
	) -> ExchangeFuture<'a>;
}

/// Encodes form pairs into an `application/x-www-form-urlencoded` body.
pub fn encode_form(form: &[(&'static str, String)]) -> String {
	let mut serializer = url::form_urlencoded::Serializer::new(String::new());

	for (key, value) in form {
		serializer.append_pair(key, value);
	}

	serializer.finish()
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Token requests must not follow redirects, matching OAuth 2.0 guidance that token
/// endpoints return results directly. Configure any custom [`ReqwestClient`] accordingly
/// before handing it over via [`ReqwestTokenClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTokenClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTokenClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl Default for ReqwestTokenClient {
	fn default() -> Self {
		let client = ReqwestClient::builder()
			.redirect(reqwest::redirect::Policy::none())
			.timeout(DEFAULT_TIMEOUT)
			.build()
			.unwrap_or_else(|_| ReqwestClient::new());

		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTokenClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTokenClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestTokenClient {
	fn post_form<'a>(
		&'a self,
		endpoint: &'a Url,
		form: &'a [(&'static str, String)],
	) -> ExchangeFuture<'a> {
		let client = self.0.clone();
		let endpoint = endpoint.clone();
		let body = encode_form(form);

		Box::pin(async move {
			let request = client
				.post(endpoint.as_str())
				.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
				.body(body)
				.build()
				.map_err(ExchangeError::assembly)?;
			let response = client.execute(request).await.map_err(ExchangeError::transport)?;
			let status = response.status().as_u16();
			let body = response.text().await.map_err(ExchangeError::body_read)?;

			Ok(TokenEndpointResponse { status, body })
		})
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ExchangeError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn form_encoding_escapes_reserved_characters() {
		let form = [
			("code", "abc 123".to_owned()),
			("redirect_uri", "https://app.example.com/cb?x=1".to_owned()),
			("grant_type", "authorization_code".to_owned()),
		];
		let encoded = encode_form(&form);

		assert_eq!(
			encoded,
			"code=abc+123&redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb%3Fx%3D1&grant_type=authorization_code"
		);
	}

	#[test]
	fn form_encoding_preserves_pair_order() {
		let form = [("b", "2".to_owned()), ("a", "1".to_owned())];

		assert_eq!(encode_form(&form), "b=2&a=1");
	}
}
