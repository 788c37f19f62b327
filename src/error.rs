//! Client-level error types shared across the transport, session store, and resource services.

// crates.io
use ::http::{Method, StatusCode};
// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Session-store failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Backend answered with a body that does not match the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),
}
impl Error {
	/// HTTP status attached to the error, when the backend produced one.
	pub fn status(&self) -> Option<StatusCode> {
		match self {
			Self::Api(e) => Some(e.status),
			Self::Decode(e) => Some(e.status),
			_ => None,
		}
	}

	/// Returns `true` when the backend rejected the call with HTTP 401.
	pub fn is_unauthorized(&self) -> bool {
		self.status() == Some(StatusCode::UNAUTHORIZED)
	}

	/// Human-readable message suitable for inline display.
	///
	/// Backend errors surface their `detail` payload; everything else falls back to the error's
	/// own [`Display`] output.
	pub fn display_message(&self) -> String {
		match self {
			Self::Api(e) => e.detail().unwrap_or_else(|| e.to_string()),
			other => other.to_string(),
		}
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Raw value that failed to parse.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL `{url}` must use http or https.")]
	UnsupportedScheme {
		/// Offending URL.
		url: String,
	},
	/// Request path cannot be joined onto the base URL.
	#[error("Request path `{path}` cannot be resolved against the base URL.")]
	InvalidPath {
		/// Path supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name or value is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Header name supplied by the caller.
		name: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	RequestBody(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success response returned by the backend, passed through untouched.
#[derive(Debug, ThisError)]
#[error("Backend rejected {method} {url} with HTTP {status}.")]
pub struct ApiError {
	/// Method of the failing call.
	pub method: Method,
	/// Fully resolved URL of the failing call.
	pub url: Url,
	/// Status returned by the backend.
	pub status: StatusCode,
	/// Raw response body decoded lossily as UTF-8.
	pub body: String,
}
impl ApiError {
	/// Extracts the backend's human-readable message.
	///
	/// Understands `{"detail": "..."}`, the validation form
	/// `{"detail": [{"msg": "..."}, ...]}`, and `{"message": "..."}`.
	pub fn detail(&self) -> Option<String> {
		let value = serde_json::from_str::<serde_json::Value>(&self.body).ok()?;

		match value.get("detail") {
			Some(serde_json::Value::String(detail)) => return Some(detail.to_owned()),
			Some(serde_json::Value::Array(items)) => {
				let messages = items
					.iter()
					.filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
					.collect::<Vec<_>>();

				if !messages.is_empty() {
					return Some(messages.join("; "));
				}
			},
			_ => (),
		}

		value.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
	}
}

/// Response body could not be decoded into the expected type.
#[derive(Debug, ThisError)]
#[error("Backend returned a malformed body for {url} (HTTP {status}).")]
pub struct DecodeError {
	/// URL of the call that produced the body.
	pub url: Url,
	/// Status of the response carrying the body.
	pub status: StatusCode,
	/// Structured parsing failure.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
}
