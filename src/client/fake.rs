//! Scripted in-process transport for unit tests.

// crates.io
use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	client::ApiClient,
	config::ClientConfigBuilder,
	error::TransportError,
	http::{ApiHttpClient, ApiResponse, HttpFuture, MultipartForm, OutboundRequest, RequestBody},
	store::MemoryStore,
};

type Responder = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

/// Snapshot of one outbound call as the transport saw it.
#[derive(Clone, Debug)]
pub(crate) struct Recorded {
	pub method: Method,
	pub path: String,
	pub query: Vec<(String, String)>,
	pub authorization: Option<String>,
	pub content_type: Option<String>,
	pub body: Option<serde_json::Value>,
	pub multipart: Option<MultipartForm>,
}
impl Recorded {
	pub fn query_pairs(&self) -> Vec<(&str, &str)> {
		self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
	}
}

/// Scripted answer for one call.
pub(crate) enum Reply {
	Response { status: u16, headers: Vec<(&'static str, String)>, body: Vec<u8> },
	NetworkDown,
}
impl Reply {
	pub fn json(status: u16, body: &str) -> Self {
		Self::Response {
			status,
			headers: vec![("content-type", "application/json".into())],
			body: body.as_bytes().to_vec(),
		}
	}

	pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
		if let Self::Response { headers, .. } = &mut self {
			headers.push((name, value.into()));
		}

		self
	}

	pub fn bytes(status: u16, body: &[u8]) -> Self {
		Self::Response { status, headers: Vec::new(), body: body.to_vec() }
	}
}

/// Transport that answers from a closure and keeps a log of every call.
#[derive(Clone)]
pub(crate) struct FakeHttpClient {
	responder: Responder,
	log: Arc<Mutex<Vec<Recorded>>>,
}
impl FakeHttpClient {
	pub fn new(responder: impl Fn(&Recorded) -> Reply + Send + Sync + 'static) -> Self {
		Self { responder: Arc::new(responder), log: Default::default() }
	}

	pub fn client(
		&self,
		config: ClientConfigBuilder,
	) -> (ApiClient<FakeHttpClient>, Arc<MemoryStore>) {
		let store = Arc::new(MemoryStore::default());
		let config = config.build().expect("Test config should build.");
		let client = ApiClient::with_http_client(config, store.clone(), self.clone());

		(client, store)
	}

	pub fn calls(&self) -> Vec<Recorded> {
		self.log.lock().clone()
	}

	pub fn calls_to(&self, path: &str) -> usize {
		self.log.lock().iter().filter(|call| call.path == path).count()
	}

	pub fn authorizations(&self, path: &str) -> Vec<Option<String>> {
		self.log
			.lock()
			.iter()
			.filter(|call| call.path == path)
			.map(|call| call.authorization.clone())
			.collect()
	}

	pub fn last(&self, path: &str) -> Option<Recorded> {
		self.log.lock().iter().rev().find(|call| call.path == path).cloned()
	}
}
impl ApiHttpClient for FakeHttpClient {
	fn execute(&self, request: OutboundRequest) -> HttpFuture<'_> {
		Box::pin(async move {
			let header = |name: HeaderName| {
				request.headers.get(name).and_then(|v| v.to_str().ok()).map(ToOwned::to_owned)
			};
			let (body, multipart) = match &request.body {
				RequestBody::Json(value) => (Some(value.clone()), None),
				RequestBody::Multipart(form) => (None, Some(form.clone())),
				RequestBody::Empty | RequestBody::Bytes { .. } => (None, None),
			};
			let recorded = Recorded {
				method: request.method.clone(),
				path: request.url.path().to_owned(),
				query: request.url.query_pairs().into_owned().collect(),
				authorization: header(AUTHORIZATION),
				content_type: header(CONTENT_TYPE),
				body,
				multipart,
			};

			self.log.lock().push(recorded.clone());
			// Give concurrent requests a chance to interleave.
			tokio::task::yield_now().await;

			match (self.responder)(&recorded) {
				Reply::NetworkDown => Err(TransportError::Io(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					"connection refused",
				))),
				Reply::Response { status, headers, body } => {
					let mut map = HeaderMap::new();

					for (name, value) in headers {
						map.insert(
							HeaderName::from_static(name),
							HeaderValue::from_str(&value).expect("Scripted header should be valid."),
						);
					}

					Ok(ApiResponse::new(
						request.url.clone(),
						StatusCode::from_u16(status).expect("Scripted status should be valid."),
						map,
						body,
					))
				},
			}
		})
	}
}
