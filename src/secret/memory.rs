//! In-process [`SecretStore`] mirroring the JSON-map payload contract of managed stores.

// self
use crate::{
	_prelude::*,
	secret::{self, SecretError, SecretErrorKind, SecretFuture, SecretStore, SecretString},
};

/// Thread-safe secret store holding raw JSON payloads for tests and demos.
///
/// Payloads are stored exactly as a managed secret store would return them: a JSON object
/// mapping secret names to values. A forced failure mode lets tests exercise every lookup
/// subcode without a real backend.
#[derive(Clone, Debug, Default)]
pub struct MemorySecretStore {
	payloads: Arc<RwLock<HashMap<String, String>>>,
	forced_failure: Arc<RwLock<Option<SecretErrorKind>>>,
}
impl MemorySecretStore {
	/// Registers a raw JSON payload under `name`.
	pub fn insert_payload(&self, name: impl Into<String>, payload: impl Into<String>) {
		self.payloads.write().insert(name.into(), payload.into());
	}

	/// Registers a single-entry payload mapping `name` to `value`, the shape managed
	/// stores return for simple secrets.
	pub fn insert_value(&self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let mut map = serde_json::Map::new();

		map.insert(name.clone(), serde_json::Value::String(value.into()));
		self.insert_payload(name, serde_json::Value::Object(map).to_string());
	}

	/// Forces every subsequent lookup to fail with `kind`.
	pub fn fail_with(&self, kind: SecretErrorKind) {
		*self.forced_failure.write() = Some(kind);
	}

	/// Clears a previously forced failure.
	pub fn heal(&self) {
		*self.forced_failure.write() = None;
	}
}
impl SecretStore for MemorySecretStore {
	fn fetch<'a>(&'a self, name: &'a str) -> SecretFuture<'a, SecretString> {
		let payloads = self.payloads.clone();
		let forced_failure = self.forced_failure.clone();

		Box::pin(async move {
			if let Some(kind) = *forced_failure.read() {
				return Err(SecretError::Lookup { kind });
			}

			let payload = payloads
				.read()
				.get(name)
				.cloned()
				.ok_or(SecretError::Lookup { kind: SecretErrorKind::NotFound })?;

			secret::extract_secret(&payload, name)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn fetch_extracts_the_named_entry() {
		let store = MemorySecretStore::default();

		store.insert_value("CLIENT_SECRET", "s3cr3t");

		let secret = store
			.fetch("CLIENT_SECRET")
			.await
			.expect("Fetching a registered secret should succeed.");

		assert_eq!(secret.expose(), "s3cr3t");
	}

	#[tokio::test]
	async fn fetch_reports_not_found_for_unknown_names() {
		let store = MemorySecretStore::default();
		let err = store
			.fetch("MISSING")
			.await
			.expect_err("Fetching an unregistered secret should fail.");

		assert!(matches!(err, SecretError::Lookup { kind: SecretErrorKind::NotFound }));
	}

	#[tokio::test]
	async fn forced_failures_shadow_registered_secrets() {
		let store = MemorySecretStore::default();

		store.insert_value("CLIENT_SECRET", "s3cr3t");
		store.fail_with(SecretErrorKind::DecryptionFailure);

		let err = store
			.fetch("CLIENT_SECRET")
			.await
			.expect_err("A forced failure should shadow the registered secret.");

		assert!(matches!(err, SecretError::Lookup { kind: SecretErrorKind::DecryptionFailure }));

		store.heal();

		assert!(store.fetch("CLIENT_SECRET").await.is_ok());
	}
}
