//! Transport primitives for backend calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the request model ([`ApiRequest`],
//! [`RequestBody`], [`OutboundRequest`]) and [`ApiResponse`] so downstream crates can plug in a
//! custom HTTP stack. The transport never sees sessions: [`ApiClient`](crate::client::ApiClient)
//! resolves URLs and attaches headers before handing an [`OutboundRequest`] over, and it
//! interprets the status of whatever [`ApiResponse`] comes back.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{CONTENT_DISPOSITION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ApiError, ConfigError, DecodeError, TransportError},
};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type HttpFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing backend calls.
///
/// Implementations must return every HTTP response, successful or not, as `Ok`; only failures
/// that prevent a response (DNS, TCP, TLS, timeouts) are `Err`. Status interpretation, including
/// the 401 refresh cycle, belongs to the client.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and collects the full response body.
	fn execute(&self, request: OutboundRequest) -> HttpFuture<'_>;
}

/// Body attached to an [`ApiRequest`].
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document sent as `application/json`.
	Json(serde_json::Value),
	/// Raw bytes with an explicit content type.
	Bytes {
		/// Value of the `Content-Type` header.
		content_type: String,
		/// Payload.
		data: Vec<u8>,
	},
	/// `multipart/form-data` form; the transport picks the boundary.
	Multipart(MultipartForm),
}
impl RequestBody {
	/// Content type implied by the body, if the client should set one.
	pub fn content_type(&self) -> Option<&str> {
		match self {
			Self::Json(_) => Some("application/json"),
			Self::Bytes { content_type, .. } => Some(content_type),
			Self::Empty | Self::Multipart(_) => None,
		}
	}
}

/// Ordered `multipart/form-data` parts.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm {
	/// Parts in submission order.
	pub parts: Vec<MultipartPart>,
}
impl MultipartForm {
	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(MultipartPart::Text { name: name.into(), value: value.into() });

		self
	}

	/// Appends a file field.
	pub fn file(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		mime: Option<String>,
		data: Vec<u8>,
	) -> Self {
		self.parts.push(MultipartPart::File {
			name: name.into(),
			file_name: file_name.into(),
			mime,
			data,
		});

		self
	}
}

/// Single `multipart/form-data` part.
#[derive(Clone, Debug)]
pub enum MultipartPart {
	/// Plain text field.
	Text {
		/// Field name.
		name: String,
		/// Field value.
		value: String,
	},
	/// File upload field.
	File {
		/// Field name.
		name: String,
		/// File name reported to the backend.
		file_name: String,
		/// MIME type, when known.
		mime: Option<String>,
		/// File contents.
		data: Vec<u8>,
	},
}

/// Caller-facing description of a backend call.
///
/// The path is relative to the configured base URL. The `retried` marker records whether the
/// request has already been re-issued after a 401 and lives only as long as the call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the base URL (or an absolute URL).
	pub path: String,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// Per-call header overrides.
	pub headers: Vec<(String, String)>,
	/// Request body.
	pub body: RequestBody,
	retried: bool,
}
impl ApiRequest {
	/// Creates a request for `method` and `path`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: RequestBody::Empty,
			retried: false,
		}
	}

	/// `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.query.push((key.into(), value.to_string()));

		self
	}

	/// Appends a query parameter only when `value` is present.
	pub fn query_opt<V>(self, key: impl Into<String>, value: Option<V>) -> Self
	where
		V: ToString,
	{
		match value {
			Some(value) => self.query(key, value),
			None => self,
		}
	}

	/// Adds a per-call header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Serializes `body` as the JSON payload.
	pub fn json<T>(mut self, body: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_value(body).map_err(ConfigError::from)?);

		Ok(self)
	}

	/// Attaches a multipart form.
	pub fn multipart(mut self, form: MultipartForm) -> Self {
		self.body = RequestBody::Multipart(form);

		self
	}

	/// Attaches a raw body.
	pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
		self.body = RequestBody::Bytes { content_type: content_type.into(), data };

		self
	}

	/// Returns `true` once the request has been re-issued after a 401.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}

	/// Resolves the full URL (base + path + query).
	pub fn resolve(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
		let mut url = config.endpoint(&self.path)?;

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		Ok(url)
	}

	pub(crate) fn header_map(&self) -> Result<HeaderMap, ConfigError> {
		let mut headers = HeaderMap::new();

		for (name, value) in &self.headers {
			let invalid = || ConfigError::InvalidHeader { name: name.clone() };
			let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
			let value = HeaderValue::from_str(value).map_err(|_| invalid())?;

			headers.insert(name, value);
		}

		Ok(headers)
	}
}

/// Fully resolved request handed to an [`ApiHttpClient`].
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL including the query string.
	pub url: Url,
	/// Final header set, including `Authorization` when a session exists.
	pub headers: HeaderMap,
	/// Request body.
	pub body: RequestBody,
	/// Optional timeout for this call.
	pub timeout: Option<StdDuration>,
}

/// Response returned by the backend, status untouched.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	url: Url,
	status: StatusCode,
	headers: HeaderMap,
	body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response; used by transports.
	pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
		Self { url, status, headers, body }
	}

	/// URL the response was produced for.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Returns a header as UTF-8 text, if present and valid.
	pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
		self.headers.get(name.as_ref())?.to_str().ok()
	}

	/// Raw body bytes (binary downloads).
	pub fn bytes(&self) -> &[u8] {
		&self.body
	}

	/// Consumes the response and returns its body.
	pub fn into_bytes(self) -> Vec<u8> {
		self.body
	}

	/// Body decoded lossily as UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		// Empty bodies decode as `null` so unit-like responses still succeed.
		let body: &[u8] = if self.body.is_empty() { b"null" } else { &self.body };
		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let mut track = serde_path_to_error::Track::new();
		let decoded = T::deserialize(serde_path_to_error::Deserializer::new(
			&mut deserializer,
			&mut track,
		))
		.and_then(|value| deserializer.end().map(|()| value));

		decoded.map_err(|e| {
			let source = serde_path_to_error::Error::new(track.path(), e);

			DecodeError { url: self.url.clone(), status: self.status, source }.into()
		})
	}

	/// File name advertised by `Content-Disposition`, if any.
	pub fn attachment_filename(&self) -> Option<String> {
		parse_content_disposition(self.headers.get(CONTENT_DISPOSITION)?.to_str().ok()?)
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Converts a non-2xx response into an [`ApiError`].
	pub fn error_for_status(self, method: &Method) -> Result<Self, ApiError> {
		if self.is_success() {
			return Ok(self);
		}

		Err(ApiError {
			method: method.clone(),
			url: self.url,
			status: self.status,
			body: String::from_utf8_lossy(&self.body).into_owned(),
		})
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	fn form(form: MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
		let mut multipart = reqwest::multipart::Form::new();

		for part in form.parts {
			multipart = match part {
				MultipartPart::Text { name, value } => multipart.text(name, value),
				MultipartPart::File { name, file_name, mime, data } => {
					let mut file = reqwest::multipart::Part::bytes(data).file_name(file_name);

					if let Some(mime) = mime {
						file = file.mime_str(&mime)?;
					}

					multipart.part(name, file)
				},
			};
		}

		Ok(multipart)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: OutboundRequest) -> HttpFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let OutboundRequest { method, url, headers, body, timeout } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(timeout) = timeout {
				builder = builder.timeout(timeout);
			}

			builder = match body {
				RequestBody::Empty => builder,
				RequestBody::Json(value) => builder.body(
					serde_json::to_vec(&value)
						.map_err(|e| TransportError::Io(std::io::Error::other(e)))?,
				),
				RequestBody::Bytes { data, .. } => builder.body(data),
				RequestBody::Multipart(form) => builder.multipart(Self::form(form)?),
			};

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let final_url = response.url().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse::new(final_url, status, headers, body))
		})
	}
}

fn parse_content_disposition(value: &str) -> Option<String> {
	let (_, rest) = value.split_once("filename=")?;
	let name = rest.split(';').next()?.trim().trim_matches('"');

	(!name.is_empty()).then(|| name.to_owned())
}

pub(crate) fn content_type_header(body: &RequestBody) -> Option<(HeaderName, HeaderValue)> {
	let value = HeaderValue::from_str(body.content_type()?).ok()?;

	Some((CONTENT_TYPE, value))
}
