//! Thread-safe in-memory [`StateCache`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	cache::{CacheError, CacheFuture, StateCache},
};

type TokenMap = Arc<RwLock<HashMap<String, OffsetDateTime>>>;

/// Thread-safe cache backend that keeps state tokens in-process for tests and demos.
///
/// Expired entries are evicted lazily on lookup; there is no background sweeper.
#[derive(Clone, Debug, Default)]
pub struct MemoryStateCache(TokenMap);
impl MemoryStateCache {
	fn put_now(map: TokenMap, token: String, ttl: Duration) -> Result<(), CacheError> {
		map.write().insert(token, OffsetDateTime::now_utc() + ttl);

		Ok(())
	}

	fn contains_now(map: TokenMap, token: &str) -> bool {
		let now = OffsetDateTime::now_utc();
		let mut guard = map.write();

		match guard.get(token) {
			Some(expires_at) if *expires_at > now => true,
			Some(_) => {
				guard.remove(token);

				false
			},
			None => false,
		}
	}
}
impl StateCache for MemoryStateCache {
	fn put<'a>(&'a self, token: &'a str, ttl: Duration) -> CacheFuture<'a, ()> {
		let map = self.0.clone();
		let token = token.to_owned();

		Box::pin(async move { Self::put_now(map, token, ttl) })
	}

	fn contains<'a>(&'a self, token: &'a str) -> CacheFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::contains_now(map, token)) })
	}
}
