//! Client configuration: backend location, auth endpoint paths, and refresh policy.

// std
use std::{env, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "MAGAZINE365_API_BASE_URL";
/// Backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://poems-make-motion-indianapolis.trycloudflare.com";
/// Default login endpoint path.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";
/// Default refresh endpoint path.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// How concurrent 401 recoveries are coordinated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
	/// Every failing request runs its own refresh exchange; the store is last-writer-wins.
	#[default]
	PerRequest,
	/// Refresh exchanges are serialized; requests that waited on a completed exchange reuse its
	/// token instead of exchanging again.
	Shared,
}

/// Immutable configuration consumed by [`ApiClient`](crate::client::ApiClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend base URL without a trailing slash.
	pub base_url: Url,
	/// Path of the login endpoint.
	pub login_path: String,
	/// Path of the refresh endpoint; 401s from it never trigger a refresh.
	pub refresh_path: String,
	/// Coordination policy for concurrent refreshes.
	pub refresh_policy: RefreshPolicy,
	/// Optional per-request timeout; transport default when `None`.
	pub timeout: Option<StdDuration>,
}
impl ClientConfig {
	/// Creates a new builder seeded with defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Builds a configuration from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder();

		if let Some(value) = env::var(BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty()) {
			builder = builder.base_url(value);
		}

		builder.build()
	}

	/// Resolves `path` against the base URL.
	///
	/// A leading slash is optional. Absolute `http(s)` URLs bypass the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let raw = if is_absolute(path) {
			path.to_owned()
		} else {
			format!(
				"{}/{}",
				self.base_url.as_str().trim_end_matches('/'),
				path.trim_start_matches('/')
			)
		};

		Url::parse(&raw).map_err(|source| ConfigError::InvalidPath { path: path.into(), source })
	}

	/// Returns `true` when `url` points at the refresh endpoint.
	pub fn is_refresh_endpoint(&self, url: &Url) -> bool {
		self.endpoint(&self.refresh_path)
			.map(|refresh| {
				refresh.origin() == url.origin()
					&& refresh.path().trim_end_matches('/') == url.path().trim_end_matches('/')
			})
			.unwrap_or(false)
	}
}
/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// Raw base URL; [`DEFAULT_BASE_URL`] when unset.
	pub base_url: Option<String>,
	/// Login endpoint override.
	pub login_path: Option<String>,
	/// Refresh endpoint override.
	pub refresh_path: Option<String>,
	/// Refresh coordination policy.
	pub refresh_policy: RefreshPolicy,
	/// Optional per-request timeout.
	pub timeout: Option<StdDuration>,
}
impl ClientConfigBuilder {
	/// Sets the backend base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Overrides the login endpoint path.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = Some(path.into());

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = Some(path.into());

		self
	}

	/// Selects the refresh coordination policy.
	pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Applies a per-request timeout.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let raw = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());
		let trimmed = raw.trim().trim_end_matches('/');
		let base_url = Url::parse(trimmed)
			.map_err(|source| ConfigError::InvalidBaseUrl { value: raw.clone(), source })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: base_url.into() });
		}

		Ok(ClientConfig {
			base_url,
			login_path: self.login_path.unwrap_or_else(|| DEFAULT_LOGIN_PATH.into()),
			refresh_path: self.refresh_path.unwrap_or_else(|| DEFAULT_REFRESH_PATH.into()),
			refresh_policy: self.refresh_policy,
			timeout: self.timeout,
		})
	}
}

fn is_absolute(path: &str) -> bool {
	path.starts_with("http://") || path.starts_with("https://")
}
