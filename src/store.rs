//! Storage contracts and built-in session store implementations.
//!
//! Stores model a browser-style key-value storage: string keys, string values, no expiry and
//! no encryption. Keys are restricted to [`SessionKey`] so callers cannot drift from the
//! persisted layout.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// String-only key-value storage backing the persisted session.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: SessionKey) -> StoreFuture<'_, Option<String>>;

	/// Stores or replaces the value under `key`.
	fn set(&self, key: SessionKey, value: String) -> StoreFuture<'_, ()>;

	/// Removes `key`; removing an absent key is not an error.
	fn remove(&self, key: SessionKey) -> StoreFuture<'_, ()>;
}

/// Keys the session is persisted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
	/// Bearer access token.
	AccessToken,
	/// Refresh token.
	RefreshToken,
	/// Role of the signed-in staff member.
	UserRole,
	/// Identifier of the signed-in staff member.
	UserId,
}
impl SessionKey {
	/// Every key, in teardown order.
	pub const ALL: [Self; 4] = [Self::AccessToken, Self::RefreshToken, Self::UserRole, Self::UserId];

	/// Returns the storage key string.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AccessToken => "access_token",
			Self::RefreshToken => "refresh_token",
			Self::UserRole => "user_role",
			Self::UserId => "user_id",
		}
	}
}
impl Display for SessionKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
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
