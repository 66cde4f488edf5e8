//! Token-endpoint response shape validation.

// self
use crate::_prelude::*;

/// Structured parse failure raised when the token body fails shape validation.
pub type TokenParseError = serde_path_to_error::Error<serde_json::Error>;

/// Token payload returned by the provider; every field beyond `access_token` is ignored.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
	/// Bearer access token issued for the exchanged authorization code.
	pub access_token: String,
}
impl TokenResponse {
	/// Validates the shape of a raw token-endpoint body.
	///
	/// The raw wire body is what callers forward downstream; the parsed value exists only
	/// to prove the payload carries an `access_token`. A body without one—including the
	/// provider's own error payloads—is a parse failure.
	pub fn parse(raw: &str) -> Result<Self, TokenParseError> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);

		serde_path_to_error::deserialize(&mut deserializer)
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse").field("access_token", &"<redacted>").finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parse_accepts_minimal_payloads() {
		let token = TokenResponse::parse("{\"access_token\":\"abc123\"}")
			.expect("Minimal token payload should parse.");

		assert_eq!(token.access_token, "abc123");
	}

	#[test]
	fn parse_ignores_extra_fields() {
		let token = TokenResponse::parse(
			"{\"access_token\":\"abc123\",\"user_id\":17841400000000000,\"token_type\":\"bearer\"}",
		)
		.expect("Extra fields should be ignored.");

		assert_eq!(token.access_token, "abc123");
	}

	#[test]
	fn parse_rejects_payloads_without_access_token() {
		let err = TokenResponse::parse(
			"{\"error_type\":\"OAuthException\",\"error_message\":\"Invalid code\"}",
		)
		.expect_err("Provider error payloads must fail shape validation.");

		assert!(err.to_string().contains("access_token"));
	}

	#[test]
	fn parse_rejects_non_json_bodies() {
		assert!(TokenResponse::parse("<html>Bad Gateway</html>").is_err());
	}

	#[test]
	fn debug_redacts_the_token() {
		let token = TokenResponse::parse("{\"access_token\":\"abc123\"}")
			.expect("Minimal token payload should parse.");

		assert!(!format!("{token:?}").contains("abc123"));
	}
}
