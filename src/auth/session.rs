//! Persisted staff session and its mapping onto the string-only session store.

// self
use crate::{
	_prelude::*,
	auth::{LoginResponse, TokenPair, TokenSecret},
	store::{SessionKey, SessionStore, StoreError},
};

/// Bearer session persisted across restarts.
///
/// Tokens are opaque; the client never parses or validates them locally.
#[derive(Clone, Debug)]
pub struct Session {
	/// Bearer access token attached to every outbound request.
	pub access_token: TokenSecret,
	/// Refresh token exchanged when the backend answers 401.
	pub refresh_token: Option<TokenSecret>,
	/// Role label of the signed-in staff member.
	pub user_role: Option<String>,
	/// Identifier of the signed-in staff member.
	pub user_id: Option<String>,
}
impl Session {
	/// Builds the session that a successful login establishes.
	pub fn from_login(response: &LoginResponse) -> Self {
		Self {
			access_token: response.access_token.clone(),
			refresh_token: Some(response.refresh_token.clone()),
			user_role: Some(response.user.role.clone()),
			user_id: Some(response.user.id.to_string()),
		}
	}

	/// Reads the session from `store`; `None` when no access token is stored.
	pub async fn load(store: &dyn SessionStore) -> Result<Option<Self>, StoreError> {
		let Some(access_token) = store.get(SessionKey::AccessToken).await? else {
			return Ok(None);
		};

		Ok(Some(Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: store.get(SessionKey::RefreshToken).await?.map(TokenSecret::new),
			user_role: store.get(SessionKey::UserRole).await?,
			user_id: store.get(SessionKey::UserId).await?,
		}))
	}

	/// Writes every populated field into `store`.
	pub async fn persist(&self, store: &dyn SessionStore) -> Result<(), StoreError> {
		store.set(SessionKey::AccessToken, self.access_token.expose().to_owned()).await?;

		if let Some(refresh) = &self.refresh_token {
			store.set(SessionKey::RefreshToken, refresh.expose().to_owned()).await?;
		}
		if let Some(role) = &self.user_role {
			store.set(SessionKey::UserRole, role.clone()).await?;
		}
		if let Some(id) = &self.user_id {
			store.set(SessionKey::UserId, id.clone()).await?;
		}

		Ok(())
	}

	/// Stores a rotated token pair, keeping the old refresh token if none was issued.
	pub async fn store_tokens(store: &dyn SessionStore, pair: &TokenPair) -> Result<(), StoreError> {
		store.set(SessionKey::AccessToken, pair.access_token.expose().to_owned()).await?;

		if let Some(refresh) = &pair.refresh_token {
			store.set(SessionKey::RefreshToken, refresh.expose().to_owned()).await?;
		}

		Ok(())
	}

	/// Removes every session key from `store`.
	pub async fn clear(store: &dyn SessionStore) -> Result<(), StoreError> {
		for key in SessionKey::ALL {
			store.remove(key).await?;
		}

		Ok(())
	}
}
