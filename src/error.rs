//! Handshake-level error taxonomy mapped onto terminal HTTP replies.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical handshake error exposed by public APIs.
///
/// Every variant is terminal for the invocation: nothing is retried internally and each
/// failure maps onto exactly one HTTP status via [`Error::status`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Fresh state token could not be written to the cache.
	#[error("Failed to write state to the cache")]
	CacheWrite(#[source] crate::cache::CacheError),
	/// Returned state token is unknown: missing, expired, or the lookup itself failed.
	#[error("State `{state}` was not found in the cache")]
	UnknownState {
		/// State value supplied by the caller.
		state: String,
		/// Lookup failure, when the cache errored instead of answering.
		#[source]
		source: Option<crate::cache::CacheError>,
	},
	/// Callback carried no authorization code.
	#[error("No authorization code supplied")]
	MissingAuthorizationCode,
	/// Client secret could not be retrieved from the secret store.
	#[error("Failed to get secret `{name}`")]
	SecretRetrieval {
		/// Secret name that was requested.
		name: String,
		/// Underlying lookup failure.
		#[source]
		source: crate::secret::SecretError,
	},
	/// Token exchange failed at the transport layer.
	#[error(transparent)]
	Exchange(#[from] ExchangeError),
	/// Token endpoint body failed shape validation.
	#[error("Failed to parse the token response body")]
	ResponseParse(#[source] serde_path_to_error::Error<serde_json::Error>),
}
impl Error {
	/// HTTP status the invocation terminates with.
	///
	/// Secret retrieval deliberately reports 400 rather than 500; callers depend on the
	/// asymmetry to tell rejected callbacks apart from provider-side outages.
	pub fn status(&self) -> u16 {
		match self {
			Self::CacheWrite(_) | Self::Exchange(_) | Self::ResponseParse(_) => 500,
			Self::UnknownState { .. }
			| Self::MissingAuthorizationCode
			| Self::SecretRetrieval { .. } => 400,
		}
	}

	/// Human-readable description concatenated with the underlying error chain.
	///
	/// This is the plain-text reply body; no structured error codes are exposed.
	pub fn detail(&self) -> String {
		let mut buf = self.to_string();
		let mut source = StdError::source(self);

		while let Some(cause) = source {
			buf.push_str(": ");
			buf.push_str(&cause.to_string());

			source = cause.source();
		}

		buf
	}
}

/// Transport-level failures raised while performing the token exchange.
///
/// The three variants mirror the distinct call sites of an exchange: building the
/// request, dispatching it, and draining the reply body. All of them terminate the
/// invocation with HTTP 500.
#[derive(Debug, ThisError)]
pub enum ExchangeError {
	/// Token request could not be assembled.
	#[error("Failed to assemble the token request")]
	Assembly {
		/// Transport-specific builder failure.
		#[source]
		source: BoxError,
	},
	/// Network failure (DNS, TCP, TLS) while calling the token endpoint.
	#[error("Error occurred while making the token request")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token response body could not be read.
	#[error("Failed to read the token response body")]
	BodyRead {
		/// Transport-specific read error.
		#[source]
		source: BoxError,
	},
}
impl ExchangeError {
	/// Wraps a transport's request-builder failure.
	pub fn assembly(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Assembly { source: Box::new(src) }
	}

	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Wraps a transport-specific body-read error.
	pub fn body_read(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::BodyRead { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::cache::CacheError;

	#[test]
	fn statuses_follow_the_taxonomy() {
		let cache_error = CacheError::Backend { message: "cache unreachable".into() };

		assert_eq!(Error::CacheWrite(cache_error.clone()).status(), 500);
		assert_eq!(Error::UnknownState { state: "abc".into(), source: None }.status(), 400);
		assert_eq!(Error::MissingAuthorizationCode.status(), 400);
		assert_eq!(
			Error::UnknownState { state: "abc".into(), source: Some(cache_error) }.status(),
			400
		);
		assert_eq!(
			Error::Exchange(ExchangeError::transport(std::io::Error::other("refused"))).status(),
			500
		);
	}

	#[test]
	fn detail_concatenates_the_source_chain() {
		let error =
			Error::CacheWrite(CacheError::Backend { message: "connection refused".into() });
		let detail = error.detail();

		assert!(detail.starts_with("Failed to write state to the cache: "));
		assert!(detail.contains("connection refused"));
	}

	#[test]
	fn missing_code_detail_is_the_exact_reply_body() {
		assert_eq!(Error::MissingAuthorizationCode.detail(), "No authorization code supplied");
	}

	#[test]
	fn unknown_state_detail_carries_the_supplied_state() {
		let error = Error::UnknownState { state: "forged-state".into(), source: None };

		assert!(error.detail().contains("forged-state"));
	}
}
