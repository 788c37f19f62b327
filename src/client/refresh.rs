//! 401 recovery: refresh-token exchange, session rotation, and teardown.
//!
//! [`ApiClient::request`] calls into this module exactly once per failing request. The cycle
//! reads the stored refresh token, exchanges it at the refresh endpoint with a bare transport call
//! (so a 401 from the exchange can never recurse), stores the rotated pair, and lets the caller
//! re-issue the original request. When no refresh token exists or the exchange fails, the session
//! is cleared and the [`UnauthorizedSignal`](crate::events::UnauthorizedSignal) fires.

// self
use crate::{
	_prelude::*,
	auth::{RefreshTokenRequest, Session, TokenPair, TokenSecret},
	client::ApiClient,
	config::RefreshPolicy,
	http::{ApiHttpClient, ApiRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
	store::SessionKey,
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges `refresh_token` for a new token pair without touching the session.
	///
	/// The call carries no bearer header and never enters the 401 recovery path.
	pub async fn refresh_tokens(&self, refresh_token: &TokenSecret) -> Result<TokenPair> {
		let body = RefreshTokenRequest { refresh_token: refresh_token.expose().to_owned() };
		let request = ApiRequest::post(self.config.refresh_path.clone()).json(&body)?;

		self.send_unauthenticated(&request).await?.json()
	}

	/// Runs the recovery cycle for a request that failed with `original`.
	///
	/// `sent_bearer` is the access token the failing request carried and `generation` the teardown
	/// count observed before it was sent. `Ok` means the session now holds a token worth retrying
	/// with.
	pub(crate) async fn recover(
		&self,
		original: Error,
		sent_bearer: Option<String>,
		generation: u64,
	) -> Result<()> {
		match self.config.refresh_policy {
			RefreshPolicy::PerRequest => self.refresh_cycle(original).await,
			RefreshPolicy::Shared => {
				let _singleflight = self.refresh_guard.lock().await;

				// Another waiter already tore the session down and broadcast.
				if self.refresh_metrics.teardowns() != generation {
					return Err(original);
				}

				let current = self.store.get(SessionKey::AccessToken).await?;

				match (&sent_bearer, &current) {
					// Cleared outside the recovery path, e.g. by logout.
					(Some(_), None) => Err(original),
					(sent, Some(stored)) if sent.as_deref() != Some(stored.as_str()) => {
						self.refresh_metrics.record_reuse();
						obs::trace_event(
							CallKind::Refresh,
							"reusing token rotated by a concurrent refresh",
						);

						Ok(())
					},
					_ => self.refresh_cycle(original).await,
				}
			},
		}
	}

	async fn refresh_cycle(&self, original: Error) -> Result<()> {
		const KIND: CallKind = CallKind::Refresh;

		let Some(refresh_token) = self.store.get(SessionKey::RefreshToken).await? else {
			obs::warn_event(KIND, "no refresh token stored; tearing the session down");

			self.teardown().await?;

			return Err(original);
		};
		let span = CallSpan::new(KIND, "refresh_cycle");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(async {
				let pair = self.refresh_tokens(&TokenSecret::new(refresh_token)).await?;

				Session::store_tokens(self.store.as_ref(), &pair).await?;
				self.set_default_authorization(&pair.access_token)?;

				Ok(())
			})
			.await;

		obs::record_call_result(KIND, &result);

		match result {
			Ok(()) => {
				self.refresh_metrics.record_success();

				Ok(())
			},
			Err(e) => {
				self.refresh_metrics.record_failure();
				obs::warn_event(KIND, "refresh exchange failed; tearing the session down");

				self.teardown().await?;

				Err(e)
			},
		}
	}

	/// Clears the session and the default header, then broadcasts unauthorized.
	///
	/// The signal fires even if clearing the store fails; the store error is reported afterwards.
	async fn teardown(&self) -> Result<()> {
		const KIND: CallKind = CallKind::Teardown;

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let cleared = Session::clear(self.store.as_ref()).await;

		self.clear_default_authorization();
		self.refresh_metrics.record_teardown();
		self.unauthorized.emit();
		obs::record_call_result(KIND, &cleared);

		Ok(cleared?)
	}
}
