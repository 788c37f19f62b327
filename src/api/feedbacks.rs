//! Client feedback.

// self
use crate::{
	_prelude::*,
	api::{Page, Pagination},
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// Feedback entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
	/// Record id.
	pub id: i64,
	/// Feedback text.
	pub content: String,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /feedbacks?limit&offset`.
	pub async fn feedbacks(&self, page: Pagination) -> Result<Page<FeedbackItem>> {
		self.fetch(
			ApiRequest::get("/feedbacks").query("limit", page.limit).query("offset", page.offset),
		)
		.await
	}

	/// `GET /feedbacks/{id}`.
	pub async fn feedback(&self, id: i64) -> Result<FeedbackItem> {
		self.fetch(ApiRequest::get(format!("/feedbacks/{id}"))).await
	}
}
