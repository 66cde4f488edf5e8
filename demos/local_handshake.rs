//! Walks both handshake branches locally: issue a state token, then show the callback
//! rejecting a state the cache never saw.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_handshake::{
	cache::{MemoryStateCache, StateCache},
	config::HandshakeConfig,
	handler::{Handshake, HandshakeRequest},
	secret::{MemorySecretStore, SecretStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let cache: Arc<dyn StateCache> = Arc::new(MemoryStateCache::default());
	let secrets_backend = MemorySecretStore::default();

	secrets_backend.insert_value("DEMO_CLIENT_SECRET", "demo-secret");

	let secrets: Arc<dyn SecretStore> = Arc::new(secrets_backend);
	let config = HandshakeConfig::builder()
		.client_id("demo-client")
		.redirect_uri(Url::parse("https://app.example.com/oauth/callback")?)
		.secret_name("DEMO_CLIENT_SECRET")
		.build()?;
	let handshake = Handshake::new(cache, secrets, config);
	let initiation = handshake.handle(&HandshakeRequest::default()).await;

	println!("Initiation replied with HTTP {}.", initiation.status);
	println!("Send your user to {}.", initiation.header("Location").unwrap_or("<missing>"));
	println!("State cookie: {}.", initiation.header("Set-Cookie").unwrap_or("<missing>"));

	// Simulate a forged redirect carrying a state the cache never issued.
	let forged = HandshakeRequest::from_pairs([("state", "not-issued"), ("code", "whatever")]);
	let rejection = handshake.handle(&forged).await;

	println!("Forged callback was rejected with HTTP {}: {}.", rejection.status, rejection.body);

	Ok(())
}
