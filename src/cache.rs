//! Expiring-cache contracts backing the CSRF state handshake.

pub mod memory;

pub use memory::MemoryStateCache;

// self
use crate::_prelude::*;

/// Boxed future returned by [`StateCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Expiring key-value contract implemented by state-token caches.
///
/// Exactly two operations are needed: write-with-TTL and an existence check. The check
/// consumes nothing; a state token stays valid until its TTL lapses, and peers sharing the
/// cache see the same tokens.
pub trait StateCache
where
	Self: Send + Sync,
{
	/// Stores `token` keyed by its own value, expiring after `ttl`.
	fn put<'a>(&'a self, token: &'a str, ttl: Duration) -> CacheFuture<'a, ()>;

	/// Returns whether `token` is present and unexpired.
	fn contains<'a>(&'a self, token: &'a str) -> CacheFuture<'a, bool>;
}

/// Error type produced by [`StateCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the cache engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
