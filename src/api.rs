//! Typed resource services for the admin backend.
//!
//! Every helper is an inherent method on [`ApiClient`](crate::client::ApiClient) and goes through
//! the authenticated path, so token attachment and 401 recovery apply uniformly. Each submodule
//! owns the wire types of one backend resource.

pub mod clients;
pub mod conversations;
pub mod dashboard;
pub mod feedbacks;
pub mod orders;
pub mod pdf_channels;
pub mod plans;
pub mod prices;
pub mod reservations;
pub mod telegram;

pub use clients::*;
pub use dashboard::*;
pub use feedbacks::*;
pub use orders::*;
pub use pdf_channels::*;
pub use plans::*;
pub use prices::*;
pub use reservations::*;
pub use telegram::*;

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
use serde_json::Value;
// self
use crate::{_prelude::*, error::DecodeError, http::ApiResponse};

/// Default page size used by list endpoints.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Paged list envelope: `{ "total": n, "items": [...] }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
	/// Total number of matching records on the backend.
	#[serde(default)]
	pub total: u64,
	/// Records on this page.
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
}

/// `limit`/`offset` window for paged endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
	/// Maximum number of records to return.
	pub limit: u32,
	/// Number of records to skip.
	pub offset: u32,
}
impl Pagination {
	/// Creates a window starting at `offset`.
	pub fn new(limit: u32, offset: u32) -> Self {
		Self { limit, offset }
	}
}
impl Default for Pagination {
	fn default() -> Self {
		Self { limit: DEFAULT_PAGE_LIMIT, offset: 0 }
	}
}

/// Accepted list shapes when normalizing loosely typed list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ListShape {
	/// `{ "items": [...] }` or a bare array.
	WrappedOrBare,
	/// Only a bare array.
	Bare,
}

/// Decodes a list endpoint that may answer with either a wrapper object or a bare array.
///
/// Any other shape yields an empty list; items that do not match `T` are a decode error.
pub(crate) fn decode_list<T>(response: &ApiResponse, shape: ListShape) -> Result<Vec<T>>
where
	T: DeserializeOwned,
{
	let items = match response.json::<Value>()? {
		Value::Object(mut map) if shape == ListShape::WrappedOrBare => match map.remove("items") {
			Some(items @ Value::Array(_)) => items,
			_ => return Ok(Vec::new()),
		},
		items @ Value::Array(_) => items,
		_ => return Ok(Vec::new()),
	};

	serde_path_to_error::deserialize(items).map_err(|source| {
		DecodeError { url: response.url().clone(), status: response.status(), source }.into()
	})
}

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
