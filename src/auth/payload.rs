//! Request and response bodies for the `/auth/*` endpoints.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Credentials posted to `/auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdminLogin {
	/// Staff username.
	pub username: String,
	/// Staff password; never logged.
	pub password: String,
}
impl AdminLogin {
	/// Builds a login payload.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into() }
	}
}
impl Debug for AdminLogin {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdminLogin")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Authenticated staff member returned by `/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
	/// Numeric user identifier.
	pub id: i64,
	/// Login name.
	pub username: String,
	/// Role label (e.g. `admin`).
	pub role: String,
}

/// Successful `/auth/login` response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
	/// Bearer access token.
	pub access_token: TokenSecret,
	/// Refresh token used to mint new access tokens.
	pub refresh_token: TokenSecret,
	/// Authenticated user profile.
	pub user: UserInfo,
}

/// Body posted to `/auth/refresh`.
#[derive(Clone, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
	/// Refresh token being exchanged.
	pub refresh_token: String,
}

/// Token pair returned by `/auth/refresh`.
///
/// The backend may omit `refresh_token`, in which case the stored one stays in use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPair {
	/// Fresh bearer access token.
	pub access_token: TokenSecret,
	/// Rotated refresh token, when issued.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_token: Option<TokenSecret>,
}
