//! Thread-safe in-memory [`TokenStore`] implementation, the client's default.

// self
use crate::{
	_prelude::*,
	auth::Token,
	store::{StoreFuture, TokenStore},
};

/// Keeps a single token in-process and merges partial updates into it.
///
/// The held token sits behind a mutex, so one store can back concurrent calls. Tokens do not
/// survive a restart; use [`FileStore`](crate::store::FileStore) or a custom [`TokenStore`]
/// when they must.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<Mutex<Token>>);
impl MemoryStore {
	/// Creates a store seeded with `token`.
	pub fn new(token: Token) -> Self {
		Self(Arc::new(Mutex::new(token)))
	}

	/// Returns a copy of the held token without going through the async contract.
	pub fn snapshot(&self) -> Token {
		self.0.lock().clone()
	}

	fn save_now(&self, token: Token) {
		self.0.lock().merge(token);
	}
}
impl TokenStore for MemoryStore {
	fn fetch(&self) -> StoreFuture<'_, Token> {
		let token = self.snapshot();

		Box::pin(async move { Ok(token) })
	}

	fn save(&self, token: Token) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.save_now(token);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	#[test]
	fn save_persists_the_merge() {
		let store = MemoryStore::new(Token::new("A", "B"));
		let rt = Runtime::new().expect("Failed to build Tokio runtime for memory store test.");

		rt.block_on(store.save(Token::new("", "C"))).expect("Memory store save should succeed.");

		let fetched = rt.block_on(store.fetch()).expect("Memory store fetch should succeed.");

		assert_eq!(fetched, Token::new("A", "C"));
	}

	#[test]
	fn clones_share_the_held_token() {
		let store = MemoryStore::default();
		let clone = store.clone();

		clone.save_now(Token::new("access", "refresh"));

		assert_eq!(store.snapshot(), Token::new("access", "refresh"));
	}
}
