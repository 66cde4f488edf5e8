//! Secret-lookup contracts, payload extraction, and redaction helpers.
//!
//! The underlying store returns a JSON object mapping secret names to values;
//! [`extract_secret`] pulls out the requested entry. Lookup subcodes stay distinguishable
//! for logging, but every failure collapses into the same caller-facing rejection and no
//! error text ever carries secret material.

pub mod memory;

pub use memory::MemorySecretStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SecretStore`] operations.
pub type SecretFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SecretError>> + 'a + Send>>;

/// Secret-lookup contract: resolves the secret string registered under a name.
pub trait SecretStore
where
	Self: Send + Sync,
{
	/// Fetches the secret value stored under `name`.
	fn fetch<'a>(&'a self, name: &'a str) -> SecretFuture<'a, SecretString>;
}

/// Redacted secret wrapper keeping confidential material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);
impl SecretString {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SecretString {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SecretString").field(&"<redacted>").finish()
	}
}
impl Display for SecretString {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Store-side lookup failure subcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecretErrorKind {
	/// Store could not decrypt the protected secret text.
	DecryptionFailure,
	/// Store-side internal error.
	InternalError,
	/// A lookup parameter was invalid.
	InvalidParameter,
	/// The request was not valid for the current state of the secret.
	InvalidRequest,
	/// No secret is registered under the requested name.
	NotFound,
	/// Any other store-side failure.
	Other,
}
impl SecretErrorKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			SecretErrorKind::DecryptionFailure => "decryption_failure",
			SecretErrorKind::InternalError => "internal_error",
			SecretErrorKind::InvalidParameter => "invalid_parameter",
			SecretErrorKind::InvalidRequest => "invalid_request",
			SecretErrorKind::NotFound => "not_found",
			SecretErrorKind::Other => "other",
		}
	}
}
impl Display for SecretErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SecretStore`] implementations.
#[derive(Debug, ThisError)]
pub enum SecretError {
	/// Lookup failed at the secret store.
	#[error("Secret lookup failed: {kind}.")]
	Lookup {
		/// Store-side failure subcode.
		kind: SecretErrorKind,
	},
	/// Store payload was not a JSON object of string values.
	#[error("Secret payload is not a valid JSON map.")]
	MalformedPayload {
		/// Structural parse failure; positions only, never payload content.
		#[source]
		source: serde_json::Error,
	},
	/// Payload parsed but the requested entry is absent.
	#[error("Secret `{name}` is missing from the payload.")]
	MissingEntry {
		/// Secret name that was requested.
		name: String,
	},
	/// Store returned an empty secret value.
	#[error("The secret value is empty.")]
	EmptyValue,
}

/// Extracts the entry named `name` from a JSON object mapping secret names to values.
pub fn extract_secret(payload: &str, name: &str) -> Result<SecretString, SecretError> {
	let map: HashMap<String, String> =
		serde_json::from_str(payload).map_err(|source| SecretError::MalformedPayload { source })?;

	match map.get(name) {
		Some(value) if !value.is_empty() => Ok(SecretString::new(value)),
		Some(_) => Err(SecretError::EmptyValue),
		None => Err(SecretError::MissingEntry { name: name.to_owned() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = SecretString::new("super-secret");

		assert_eq!(format!("{secret:?}"), "SecretString(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn extraction_returns_the_requested_entry() {
		let payload = "{\"CLIENT_SECRET\":\"s3cr3t\",\"UNRELATED\":\"other\"}";
		let secret = extract_secret(payload, "CLIENT_SECRET")
			.expect("Extraction should succeed for a present entry.");

		assert_eq!(secret.expose(), "s3cr3t");
	}

	#[test]
	fn extraction_rejects_missing_entries() {
		let err = extract_secret("{\"OTHER\":\"value\"}", "CLIENT_SECRET")
			.expect_err("Extraction should fail for an absent entry.");

		assert!(matches!(err, SecretError::MissingEntry { ref name } if name == "CLIENT_SECRET"));
	}

	#[test]
	fn extraction_rejects_empty_values() {
		let err = extract_secret("{\"CLIENT_SECRET\":\"\"}", "CLIENT_SECRET")
			.expect_err("Extraction should fail for an empty value.");

		assert!(matches!(err, SecretError::EmptyValue));
	}

	#[test]
	fn malformed_payload_error_leaks_no_content() {
		let err = extract_secret("{\"CLIENT_SECRET\":\"oops", "CLIENT_SECRET")
			.expect_err("Extraction should fail for truncated JSON.");

		assert!(matches!(err, SecretError::MalformedPayload { .. }));
		assert!(!err.to_string().contains("oops"), "error text must not carry payload content");
	}

	#[test]
	fn subcode_labels_are_stable() {
		assert_eq!(SecretErrorKind::DecryptionFailure.as_str(), "decryption_failure");
		assert_eq!(SecretErrorKind::NotFound.to_string(), "not_found");
	}
}
