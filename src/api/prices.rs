//! Current magazine prices.

// self
use crate::{
	_prelude::*,
	client::ApiClient,
	http::{ApiHttpClient, ApiRequest},
};

/// Price sheet for both formats, for new and returning buyers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Prices {
	/// PDF price for returning buyers.
	pub pdf_old_price: f64,
	/// Book price for returning buyers.
	pub book_old_price: f64,
	/// PDF price for new buyers.
	pub pdf_price: f64,
	/// Book price for new buyers.
	pub book_price: f64,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// `GET /prices/current`.
	pub async fn current_prices(&self) -> Result<Prices> {
		self.fetch(ApiRequest::get("/prices/current")).await
	}

	/// `POST /prices` with every price as a query parameter and no body.
	///
	/// Returns the backend's confirmation message.
	pub async fn set_prices(&self, prices: &Prices) -> Result<String> {
		let response = self
			.request(
				ApiRequest::post("/prices")
					.query("pdf_price", prices.pdf_price)
					.query("book_price", prices.book_price)
					.query("pdf_old_price", prices.pdf_old_price)
					.query("book_old_price", prices.book_old_price),
			)
			.await?;

		// Plain-text confirmations are passed through as-is.
		Ok(response.json::<String>().unwrap_or_else(|_| response.text()))
	}
}
