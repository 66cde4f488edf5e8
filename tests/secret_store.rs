#![cfg(all(feature = "reqwest", feature = "test"))]

// self
use oauth2_handshake::secret::{
	MemorySecretStore, SecretError, SecretErrorKind, SecretStore, SecretString,
};

#[tokio::test]
async fn multi_entry_payload_resolves_each_name() {
	let store = MemorySecretStore::default();

	store.insert_payload(
		"INSTAGRAM",
		"{\"INSTAGRAM\":\"insta-secret\",\"ROTATION_HINT\":\"2026-09\"}",
	);

	let secret =
		store.fetch("INSTAGRAM").await.expect("Fetching a multi-entry payload should succeed.");

	assert_eq!(secret.expose(), "insta-secret");
}

#[tokio::test]
async fn payload_missing_the_requested_entry_is_reported() {
	let store = MemorySecretStore::default();

	store.insert_payload("INSTAGRAM", "{\"OTHER\":\"value\"}");

	let err = store
		.fetch("INSTAGRAM")
		.await
		.expect_err("Fetching a payload without the requested entry should fail.");

	assert!(matches!(err, SecretError::MissingEntry { ref name } if name == "INSTAGRAM"));
}

#[tokio::test]
async fn every_lookup_subcode_round_trips() {
	let store = MemorySecretStore::default();

	store.insert_value("INSTAGRAM", "insta-secret");

	for kind in [
		SecretErrorKind::DecryptionFailure,
		SecretErrorKind::InternalError,
		SecretErrorKind::InvalidParameter,
		SecretErrorKind::InvalidRequest,
		SecretErrorKind::NotFound,
		SecretErrorKind::Other,
	] {
		store.fail_with(kind);

		let err = store
			.fetch("INSTAGRAM")
			.await
			.expect_err("A forced failure should fail the lookup.");

		assert!(matches!(err, SecretError::Lookup { kind: reported } if reported == kind));
		assert!(err.to_string().contains(kind.as_str()));
	}

	store.heal();

	assert!(store.fetch("INSTAGRAM").await.is_ok());
}

#[tokio::test]
async fn fetched_secrets_stay_redacted_in_debug_output() {
	let store = MemorySecretStore::default();

	store.insert_value("INSTAGRAM", "insta-secret");

	let secret = store
		.fetch("INSTAGRAM")
		.await
		.expect("Fetching a registered secret should succeed.");

	assert_eq!(format!("{secret:?}"), format!("{:?}", SecretString::new("anything")));
	assert!(!format!("{secret:?}").contains("insta-secret"));
}
