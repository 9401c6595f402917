//! Storage contract and built-in store implementations for API tokens.
//!
//! Implement [`TokenStore`] to keep tokens in a database, a web session, or anywhere else the
//! application already persists state. The client only ever calls [`TokenStore::fetch`] before
//! a signed request and [`TokenStore::save`] after a response carrying a rotated pair.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Token};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by token stores.
///
/// Implementations are shared behind `Arc<dyn TokenStore>` and may be called from concurrent
/// requests, so they must synchronize their own state. Dropping a returned future cancels the
/// operation; implementations should not rely on it running to completion.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current token.
	fn fetch(&self) -> StoreFuture<'_, Token>;

	/// Persists a possibly partial token update.
	///
	/// Empty fields in `token` mean "no change" and must not overwrite held values.
	fn save(&self, token: Token) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures (e.g., serde) surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn store_error_can_be_serialized() {
		let error = StoreError::Backend { message: "session expired".into() };
		let payload = serde_json::to_string(&error).expect("StoreError should serialize to JSON.");
		let round_trip: StoreError =
			serde_json::from_str(&payload).expect("Serialized error should deserialize from JSON.");

		assert_eq!(round_trip, error);
		assert_eq!(error.to_string(), "Backend failure: session expired.");
	}
}
