//! Stored bot conversation transcripts.

// self
use crate::{
	_prelude::*,
	api::{self, ListShape},
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /conversations`; any non-array answer yields an empty list.
	pub async fn conversations(&self) -> Result<Vec<String>> {
		let response = self.get("/conversations").await?;

		api::decode_list(&response, ListShape::Bare)
	}

	/// Fetches one transcript by the name listed in [`ApiClient::conversations`].
	///
	/// Names are paths served from the backend root, so they are requested as-is.
	pub async fn conversation(&self, name: &str) -> Result<serde_json::Value> {
		self.fetch(ApiRequest::get(name)).await
	}
}
