//! Outbound Telegram messages to clients.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest, MultipartForm},
};

/// Image attached to a Telegram message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type, when known.
	pub mime: Option<String>,
	/// Image bytes.
	pub data: Vec<u8>,
}
impl ImageUpload {
	/// Wraps raw image bytes.
	pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
		Self { file_name: file_name.into(), mime: None, data }
	}

	/// Sets the MIME type.
	pub fn mime(mut self, mime: impl Into<String>) -> Self {
		self.mime = Some(mime.into());

		self
	}
}

/// Response of the send-image endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendImageResponse {
	/// Whether Telegram accepted the message.
	pub success: bool,
	/// Recipient user id.
	pub user_id: i64,
	/// Backend status message.
	pub message: String,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `POST /telegram/{user_id}/send-image?chat_id=..` with `image` and `message` form parts.
	pub async fn send_telegram_image(
		&self,
		user_id: i64,
		chat_id: impl Display,
		image: ImageUpload,
		message: impl Into<String>,
	) -> Result<SendImageResponse> {
		let ImageUpload { file_name, mime, data } = image;
		let form = MultipartForm::default()
			.file("image", file_name, mime, data)
			.text("message", message);

		self.fetch(
			ApiRequest::post(format!("/telegram/{user_id}/send-image"))
				.query("chat_id", chat_id)
				.multipart(form),
		)
		.await
	}
}
