//! Monthly PDF distribution channels.

// self
use crate::{
	_prelude::*,
	api::Page,
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// PDF channel record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PdfChannel {
	/// Record id.
	pub id: i64,
	/// Display name of the channel.
	pub channel_name: String,
	/// Month the channel serves (`YYYY-MM`).
	pub channel_month: String,
	/// Invite link.
	pub channel_link: String,
	/// Whether the channel is handed out to buyers.
	pub is_active: bool,
	/// Creation timestamp as sent by the backend.
	pub created_at: String,
}

/// Body of `POST /pdf-channels`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PdfChannelCreate {
	/// Display name of the channel.
	pub channel_name: String,
	/// Month the channel serves.
	pub channel_month: String,
	/// Invite link.
	pub channel_link: String,
	/// Activation flag; backend default when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
}

/// Partial body of `PATCH /pdf-channels/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfChannelUpdate {
	/// New display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel_name: Option<String>,
	/// New month.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel_month: Option<String>,
	/// New invite link.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub channel_link: Option<String>,
	/// New activation flag.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_active: Option<bool>,
}

/// Filters for `GET /pdf-channels`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PdfChannelQuery {
	/// Activation filter.
	pub is_active: Option<bool>,
	/// Month filter.
	pub month: Option<String>,
	/// Page size.
	pub limit: Option<u32>,
	/// Page offset.
	pub offset: Option<u32>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /pdf-channels`.
	pub async fn pdf_channels(&self, query: &PdfChannelQuery) -> Result<Page<PdfChannel>> {
		self.fetch(
			ApiRequest::get("pdf-channels")
				.query_opt("is_active", query.is_active)
				.query_opt("month", query.month.as_deref())
				.query_opt("limit", query.limit)
				.query_opt("offset", query.offset),
		)
		.await
	}

	/// `GET /pdf-channels/{id}`.
	pub async fn pdf_channel(&self, id: i64) -> Result<PdfChannel> {
		self.fetch(ApiRequest::get(format!("pdf-channels/{id}"))).await
	}

	/// `POST /pdf-channels`.
	pub async fn create_pdf_channel(&self, channel: &PdfChannelCreate) -> Result<PdfChannel> {
		self.fetch(ApiRequest::post("pdf-channels").json(channel)?).await
	}

	/// `PATCH /pdf-channels/{id}`.
	pub async fn update_pdf_channel(
		&self,
		id: i64,
		channel: &PdfChannelUpdate,
	) -> Result<PdfChannel> {
		self.fetch(ApiRequest::patch(format!("pdf-channels/{id}")).json(channel)?).await
	}

	/// `DELETE /pdf-channels/{id}`.
	pub async fn delete_pdf_channel(&self, id: i64) -> Result<()> {
		self.delete(format!("pdf-channels/{id}")).await?;

		Ok(())
	}
}
