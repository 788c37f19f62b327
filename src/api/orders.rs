//! Order edits.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// Partial body of `PATCH /clients/order/{id}`; unset fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateOrder {
	/// `pdf` or `book`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<String>,
	/// Month the order is for (`YYYY-MM`).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub purchase_month: Option<String>,
	/// Delivery address or notes.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shipping_info: Option<String>,
	/// Number of copies.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_count: Option<u32>,
	/// Courier branch id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bts_branch_id: Option<i64>,
	/// Delivery lead time in days.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delivery_days: Option<u32>,
	/// PDF channel month id.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pdf_month_id: Option<i64>,
	/// Order status label.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
}
impl UpdateOrder {
	/// Sets the status label.
	pub fn status(mut self, status: impl Into<String>) -> Self {
		self.status = Some(status.into());

		self
	}

	/// Sets the delivery details.
	pub fn shipping_info(mut self, info: impl Into<String>) -> Self {
		self.shipping_info = Some(info.into());

		self
	}

	/// Sets the format and purchase month together.
	pub fn format(mut self, format: impl Into<String>, purchase_month: impl Into<String>) -> Self {
		self.format = Some(format.into());
		self.purchase_month = Some(purchase_month.into());

		self
	}
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `PATCH /clients/order/{id}`, returning the backend's JSON answer untouched.
	pub async fn update_order(&self, id: i64, order: &UpdateOrder) -> Result<serde_json::Value> {
		self.fetch(ApiRequest::patch(format!("/clients/order/{id}")).json(order)?).await
	}
}
