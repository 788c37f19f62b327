//! Book reservations.

// self
use crate::{
	_prelude::*,
	api::{self, ListShape},
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// Reservation record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
	/// Record id.
	pub id: i64,
	/// Telegram user id of the client.
	pub user_id: i64,
	/// Client full name.
	pub fullname: String,
	/// Client phone number.
	pub phone: String,
	/// Reservation expiry timestamp.
	pub reserved_until: String,
	/// Number of payment reminders already sent.
	#[serde(default)]
	pub payment_reminder_sent: u32,
	/// Status label.
	pub status: String,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
	/// Last update timestamp as sent by the backend.
	pub updated_at: String,
}

/// Filters for `GET /reservations`; unset filters are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationQuery {
	/// Status label filter.
	pub status: Option<String>,
	/// Client id filter.
	pub client_id: Option<i64>,
	/// Page size.
	pub limit: Option<u32>,
	/// Page offset.
	pub offset: Option<u32>,
}
impl ReservationQuery {
	/// Filters by status label.
	pub fn status(mut self, status: impl Into<String>) -> Self {
		self.status = Some(status.into());

		self
	}

	/// Filters by client id.
	pub fn client_id(mut self, client_id: i64) -> Self {
		self.client_id = Some(client_id);

		self
	}

	/// Applies a page window.
	pub fn page(mut self, limit: u32, offset: u32) -> Self {
		self.limit = Some(limit);
		self.offset = Some(offset);

		self
	}

	fn apply(&self, request: ApiRequest) -> ApiRequest {
		request
			.query_opt("status", self.status.as_deref())
			.query_opt("client_id", self.client_id)
			.query_opt("limit", self.limit)
			.query_opt("offset", self.offset)
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /reservations`; accepts both `{items}` and bare-array answers.
	pub async fn reservations(&self, query: &ReservationQuery) -> Result<Vec<Reservation>> {
		let response = self.request(query.apply(ApiRequest::get("reservations"))).await?;

		api::decode_list(&response, ListShape::WrappedOrBare)
	}

	/// `GET /reservations/{id}`.
	pub async fn reservation(&self, id: i64) -> Result<Reservation> {
		self.fetch(ApiRequest::get(format!("reservations/{id}"))).await
	}
}
