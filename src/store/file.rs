//! Simple file-backed [`TokenStore`] for scripts and single-host deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::Token,
	store::{StoreError, StoreFuture, TokenStore},
};

/// Persists the merged token to a JSON file after each save.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<Mutex<Token>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading an existing token.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let token = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(Mutex::new(token)) })
	}

	/// Opens the store and merges `seed` into whatever was loaded, persisting the result.
	pub fn open_with_seed(path: impl Into<PathBuf>, seed: Token) -> Result<Self, StoreError> {
		let store = Self::open(path)?;

		{
			let mut guard = store.inner.lock();

			guard.merge(seed);
			store.persist_locked(&guard)?;
		}

		Ok(store)
	}

	/// Path of the backing JSON file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Token, StoreError> {
		if !path.exists() {
			return Ok(Token::default());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(Token::default());
		}

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, token: &Token) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(token).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize token snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl TokenStore for FileStore {
	fn fetch(&self) -> StoreFuture<'_, Token> {
		Box::pin(async move { Ok(self.inner.lock().clone()) })
	}

	fn save(&self, token: Token) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.lock();
			let mut merged = guard.clone();

			merged.merge(token);
			// Memory only changes once the snapshot is on disk.
			self.persist_locked(&merged)?;
			*guard = merged;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_path() -> PathBuf {
		let unique = format!(
			"nextengine_file_store_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn save_and_reload_round_trip() {
		let path = temp_path();
		let store = FileStore::open_with_seed(&path, Token::new("access-1", "refresh-1"))
			.expect("Failed to open file store snapshot.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");

		rt.block_on(store.save(Token {
			access_token: "access-2".into(),
			access_token_end_date: "2025-01-01 10:00:00".into(),
			..Default::default()
		}))
		.expect("Failed to save partial update to file store.");
		drop(store);

		let reopened = FileStore::open(&path).expect("Failed to reopen file store snapshot.");
		let fetched =
			rt.block_on(reopened.fetch()).expect("Failed to fetch token from file store.");

		assert_eq!(fetched.access_token, "access-2");
		assert_eq!(fetched.refresh_token, "refresh-1");
		assert_eq!(fetched.access_token_end_date, "2025-01-01 10:00:00");

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_surfaces_serialization_error() {
		let path = temp_path();

		fs::write(&path, b"{not json").expect("Failed to write corrupt snapshot fixture.");

		let err = FileStore::open(&path).expect_err("Corrupt snapshot should fail to load.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary file store snapshot {}: {e}", path.display())
		});
	}
}
