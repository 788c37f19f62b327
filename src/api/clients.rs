//! Client (customer) records.

// self
use crate::{
	_prelude::*,
	api::{FeedbackItem, Page, Pagination},
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// Page size used by the sales list, which loads every client at once.
pub const SALES_LIST_LIMIT: u32 = 1000;

/// Row of `GET /clients/all_clients`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientListItem {
	/// Record id.
	pub id: i64,
	/// Full name.
	pub fullname: String,
	/// Phone number.
	pub phone: String,
	/// Name of the stored conversation transcript, if any.
	#[serde(default)]
	pub conversation_file: Option<String>,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
	/// Last update timestamp as sent by the backend.
	pub updated_at: String,
	/// Number of orders.
	#[serde(default)]
	pub orders_count: u64,
	/// Number of reservations.
	#[serde(default)]
	pub reservations_count: u64,
	/// Number of follow-ups.
	#[serde(default)]
	pub followups_count: u64,
	/// Number of feedback entries.
	#[serde(default)]
	pub feedbacks_count: u64,
}

/// Body of `POST /clients/create` and `PATCH /clients/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientCreate {
	/// Full name.
	pub fullname: String,
	/// Phone number.
	pub phone: String,
	/// Telegram numeric user id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub telegram_id: Option<i64>,
	/// Telegram handle without the `@`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub telegram_username: Option<String>,
	/// Name of the stored conversation transcript, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub conversation_file: Option<String>,
}
impl ClientCreate {
	/// Creates a payload with the required fields.
	pub fn new(fullname: impl Into<String>, phone: impl Into<String>) -> Self {
		Self { fullname: fullname.into(), phone: phone.into(), ..Default::default() }
	}

	/// Links the client to a Telegram account.
	pub fn telegram(mut self, id: i64, username: Option<String>) -> Self {
		self.telegram_id = Some(id);
		self.telegram_username = username;

		self
	}
}

/// Updates share the create payload.
pub type ClientUpdate = ClientCreate;

/// Order summary nested in [`ClientDetail`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
	/// Record id.
	pub id: i64,
	/// `pdf` or `book`.
	#[serde(default)]
	pub format: Option<String>,
	/// Month the order was purchased for.
	#[serde(default)]
	pub purchase_month: Option<String>,
	/// Status label.
	pub status: String,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
}

/// Reservation summary nested in [`ClientDetail`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservationItem {
	/// Record id.
	pub id: i64,
	/// Reservation expiry timestamp.
	pub reserved_until: String,
	/// Status label.
	pub status: String,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
}

/// Follow-up summary nested in [`ClientDetail`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FollowUpItem {
	/// Record id.
	pub id: i64,
	/// Scheduled follow-up time.
	pub follow_up_time: String,
	/// Follow-up kind label.
	#[serde(rename = "type")]
	pub kind: String,
	/// Status label.
	pub status: String,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
}

/// Response of `GET /clients/{id}` and the create/update endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientDetail {
	/// Record id.
	pub id: i64,
	/// Full name.
	pub fullname: String,
	/// Phone number.
	pub phone: String,
	/// Name of the stored conversation transcript, if any.
	#[serde(default)]
	pub conversation_file: Option<String>,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
	/// Last update timestamp as sent by the backend.
	pub updated_at: String,
	/// Orders placed by the client.
	#[serde(default)]
	pub orders: Vec<OrderItem>,
	/// Reservations held by the client.
	#[serde(default)]
	pub reservations: Vec<ReservationItem>,
	/// Scheduled follow-ups.
	#[serde(default)]
	pub followups: Vec<FollowUpItem>,
	/// Feedback left by the client.
	#[serde(default)]
	pub feedbacks: Vec<FeedbackItem>,
}

/// Client row as the sales screens consume it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalesUser {
	/// Client record id.
	pub id: i64,
	/// Telegram user id used for messaging actions.
	#[serde(default)]
	pub user_id: Option<i64>,
	/// Full name.
	pub fullname: String,
	/// Phone number.
	pub phone: String,
	/// Name of the stored conversation transcript, if any.
	#[serde(default)]
	pub conversation_file: Option<String>,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
	/// Last update timestamp as sent by the backend.
	pub updated_at: String,
	/// Purchased format.
	#[serde(default)]
	pub format: Option<String>,
	/// Status label.
	#[serde(default)]
	pub status: Option<String>,
	/// Delivery details.
	#[serde(default)]
	pub shipping_info: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /clients/all_clients?limit&offset`.
	pub async fn clients(&self, page: Pagination) -> Result<Page<ClientListItem>> {
		self.fetch(
			ApiRequest::get("/clients/all_clients")
				.query("limit", page.limit)
				.query("offset", page.offset),
		)
		.await
	}

	/// Loads the sales list, optionally filtered by order status.
	pub async fn sales_users(&self, status: Option<&str>) -> Result<Vec<SalesUser>> {
		let page: Page<SalesUser> = self
			.fetch(
				ApiRequest::get("/clients/all_clients")
					.query_opt("status", status)
					.query("limit", SALES_LIST_LIMIT),
			)
			.await?;

		Ok(page.items)
	}

	/// `GET /clients/{id}`.
	pub async fn client(&self, id: i64) -> Result<ClientDetail> {
		self.fetch(ApiRequest::get(format!("/clients/{id}"))).await
	}

	/// `GET /clients/{id}` decoded as a sales row.
	pub async fn sales_user(&self, id: i64) -> Result<SalesUser> {
		self.fetch(ApiRequest::get(format!("/clients/{id}"))).await
	}

	/// `POST /clients/create`.
	pub async fn create_client(&self, client: &ClientCreate) -> Result<ClientDetail> {
		self.fetch(ApiRequest::post("/clients/create").json(client)?).await
	}

	/// `PATCH /clients/{id}`.
	pub async fn update_client(&self, id: i64, client: &ClientUpdate) -> Result<ClientDetail> {
		self.fetch(ApiRequest::patch(format!("/clients/{id}")).json(client)?).await
	}
}
