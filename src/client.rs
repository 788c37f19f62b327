//! Authenticated API client: one outbound path for every backend call.
//!
//! [`ApiClient::request`] attaches the stored access token as a bearer header, passes every
//! non-401 response straight through, and on a 401 runs the refresh cycle implemented in
//! [`refresh`] before re-issuing the call exactly once. Login, logout, and session accessors live
//! here as well; typed resource helpers are layered on top in [`crate::api`].

pub mod refresh;

mod metrics;

#[cfg(test)] pub(crate) mod fake;

pub use metrics::RefreshMetrics;

// crates.io
use ::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{AdminLogin, LoginResponse, Session, TokenSecret},
	config::ClientConfig,
	error::ConfigError,
	events::UnauthorizedSignal,
	http::{self as transport, ApiHttpClient, ApiRequest, ApiResponse, OutboundRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
	store::{SessionKey, SessionStore},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Coordinates authenticated calls against the admin backend.
///
/// The client owns the transport, the session store, and the unauthorized signal so resource
/// helpers only describe *what* to call. Clones share every piece of state, including the
/// default header set and the refresh guard.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP client wrapper used for every outbound call.
	pub http_client: Arc<C>,
	/// Persistent session store.
	pub store: Arc<dyn SessionStore>,
	/// Backend location and auth endpoint configuration.
	pub config: ClientConfig,
	/// Broadcast fired after an unrecoverable 401 tears the session down.
	pub unauthorized: UnauthorizedSignal,
	/// Counters for refresh exchanges.
	pub refresh_metrics: Arc<RefreshMetrics>,
	default_headers: Arc<RwLock<::http::HeaderMap>>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		config: ClientConfig,
		store: Arc<dyn SessionStore>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			config,
			unauthorized: UnauthorizedSignal::default(),
			refresh_metrics: Default::default(),
			default_headers: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Shares an existing unauthorized signal instead of the client's own.
	pub fn with_unauthorized_signal(mut self, signal: UnauthorizedSignal) -> Self {
		self.unauthorized = signal;

		self
	}

	/// Sends `request` through the authenticated path.
	///
	/// Non-2xx responses become [`Error::Api`]; a 401 is recovered once via the refresh cycle.
	pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "request");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.intercept(request)).await;

		obs::record_call_result(KIND, &result);

		result
	}

	/// Sends `request` and decodes the JSON body.
	pub async fn fetch<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request(request).await?.json()
	}

	/// `GET path`.
	pub async fn get(&self, path: impl Into<String>) -> Result<ApiResponse> {
		self.request(ApiRequest::get(path)).await
	}

	/// `POST path` with a JSON body.
	pub async fn post<B>(&self, path: impl Into<String>, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(ApiRequest::post(path).json(body)?).await
	}

	/// `PATCH path` with a JSON body.
	pub async fn patch<B>(&self, path: impl Into<String>, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(ApiRequest::patch(path).json(body)?).await
	}

	/// `DELETE path`.
	pub async fn delete(&self, path: impl Into<String>) -> Result<ApiResponse> {
		self.request(ApiRequest::delete(path)).await
	}

	/// Signs in with `credentials` and persists the resulting session.
	///
	/// Login is a plain unauthenticated POST; a rejection never triggers the refresh cycle.
	pub async fn login(&self, credentials: &AdminLogin) -> Result<LoginResponse> {
		const KIND: CallKind = CallKind::Login;

		let span = CallSpan::new(KIND, "login");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request = ApiRequest::post(self.config.login_path.clone()).json(credentials)?;
				let response: LoginResponse = self.send_unauthenticated(&request).await?.json()?;

				Session::from_login(&response).persist(self.store.as_ref()).await?;

				Ok(response)
			})
			.await;

		obs::record_call_result(KIND, &result);

		result
	}

	/// Clears the stored session and the default authorization header.
	///
	/// Explicit logout does not fire the unauthorized signal.
	pub async fn logout(&self) -> Result<()> {
		self.clear_default_authorization();

		Session::clear(self.store.as_ref()).await?;

		Ok(())
	}

	/// Returns `true` when an access token is stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.store.get(SessionKey::AccessToken).await?.is_some())
	}

	/// Stored role of the signed-in staff member.
	pub async fn user_role(&self) -> Result<Option<String>> {
		Ok(self.store.get(SessionKey::UserRole).await?)
	}

	/// Stored identifier of the signed-in staff member.
	pub async fn user_id(&self) -> Result<Option<String>> {
		Ok(self.store.get(SessionKey::UserId).await?)
	}

	/// Loads the full stored session.
	pub async fn session(&self) -> Result<Option<Session>> {
		Ok(Session::load(self.store.as_ref()).await?)
	}

	/// Current value of the default `Authorization` header, if set.
	pub fn default_authorization(&self) -> Option<String> {
		self.default_headers
			.read()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.map(ToOwned::to_owned)
	}

	async fn intercept(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		let generation = self.refresh_metrics.teardowns();
		let Attempt { response, bearer } = self.send_authenticated(&request).await?;
		let eligible = response.status() == StatusCode::UNAUTHORIZED
			&& !request.is_retried()
			&& !self.config.is_refresh_endpoint(response.url());
		let original = match response.error_for_status(&request.method) {
			Ok(response) => return Ok(response),
			Err(e) if !eligible => return Err(e.into()),
			Err(e) => Error::from(e),
		};

		request.mark_retried();
		self.recover(original, bearer, generation).await?;

		let retry = self.send_authenticated(&request).await?;

		Ok(retry.response.error_for_status(&request.method)?)
	}

	async fn send_authenticated(&self, request: &ApiRequest) -> Result<Attempt> {
		let bearer = self.store.get(SessionKey::AccessToken).await?;
		let mut outbound = self.outbound(request)?;

		if let Some(token) = &bearer {
			outbound.headers.insert(AUTHORIZATION, bearer_header(&TokenSecret::new(token.as_str()))?);
		}

		let response = self.http_client.execute(outbound).await?;

		Ok(Attempt { response, bearer })
	}

	pub(crate) async fn send_unauthenticated(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let url = request.resolve(&self.config)?;
		let mut headers = request.header_map()?;

		if let Some((name, value)) = transport::content_type_header(&request.body) {
			headers.entry(name).or_insert(value);
		}

		let outbound = OutboundRequest {
			method: request.method.clone(),
			url,
			headers,
			body: request.body.clone(),
			timeout: self.config.timeout,
		};
		let response = self.http_client.execute(outbound).await?;

		Ok(response.error_for_status(&request.method)?)
	}

	fn outbound(&self, request: &ApiRequest) -> Result<OutboundRequest> {
		let url = request.resolve(&self.config)?;
		let mut headers = self.default_headers.read().clone();

		for (name, value) in request.header_map()? {
			if let Some(name) = name {
				headers.insert(name, value);
			}
		}
		if let Some((name, value)) = transport::content_type_header(&request.body) {
			headers.entry(name).or_insert(value);
		}

		Ok(OutboundRequest {
			method: request.method.clone(),
			url,
			headers,
			body: request.body.clone(),
			timeout: self.config.timeout,
		})
	}

	pub(crate) fn set_default_authorization(&self, token: &TokenSecret) -> Result<()> {
		let value = bearer_header(token)?;

		self.default_headers.write().insert(AUTHORIZATION, value);

		Ok(())
	}

	pub(crate) fn clear_default_authorization(&self) {
		self.default_headers.write().remove(AUTHORIZATION);
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client backed by the default reqwest transport.
	pub fn new(config: ClientConfig, store: Arc<dyn SessionStore>) -> Self {
		Self::with_http_client(config, store, ReqwestHttpClient::default())
	}

	/// Creates a client configured from the environment.
	pub fn from_env(store: Arc<dyn SessionStore>) -> Result<Self> {
		Ok(Self::new(ClientConfig::from_env()?, store))
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
			unauthorized: self.unauthorized.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			default_headers: self.default_headers.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("unauthorized", &self.unauthorized)
			.field("refresh_metrics", &self.refresh_metrics)
			.finish()
	}
}

/// Outcome of one send: the response plus the access token it carried.
struct Attempt {
	response: ApiResponse,
	bearer: Option<String>,
}

fn bearer_header(token: &TokenSecret) -> Result<HeaderValue, ConfigError> {
	let mut value = HeaderValue::from_str(&token.bearer())
		.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.as_str().into() })?;

	value.set_sensitive(true);

	Ok(value)
}
