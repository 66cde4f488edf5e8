//! CSRF-state OAuth 2.0 handshake handler for serverless endpoints—issue cache-backed state
//! tokens, exchange authorization codes, and forward the raw token response.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod cache;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod obs;
pub mod secret;
pub mod token;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		cache::{MemoryStateCache, StateCache},
		config::HandshakeConfig,
		handler::Handshake,
		http::ReqwestTokenClient,
		secret::{MemorySecretStore, SecretStore},
	};

	/// Handshake type alias used by reqwest-backed integration tests.
	pub type ReqwestTestHandshake = Handshake<ReqwestTokenClient>;

	/// Builds a reqwest token client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_token_client() -> ReqwestTokenClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTokenClient::with_client(client)
	}

	/// Constructs a [`Handshake`] backed by in-memory cache + secret stores and the reqwest
	/// transport used across integration tests.
	pub fn build_reqwest_test_handshake(
		config: HandshakeConfig,
	) -> (ReqwestTestHandshake, Arc<MemoryStateCache>, Arc<MemorySecretStore>) {
		let cache_backend = Arc::new(MemoryStateCache::default());
		let cache: Arc<dyn StateCache> = cache_backend.clone();
		let secrets_backend = Arc::new(MemorySecretStore::default());
		let secrets: Arc<dyn SecretStore> = secrets_backend.clone();
		let handshake =
			Handshake::with_http_client(cache, secrets, config, test_reqwest_token_client());

		(handshake, cache_backend, secrets_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
