#![cfg(feature = "reqwest")]

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// crates.io
use httpmock::prelude::*;
// self
use magazine365_api::{
	_preludet::*,
	api::{ClientCreate, Pagination},
	auth::AdminLogin,
	config::{ClientConfig, RefreshPolicy},
	http_types::StatusCode,
	store::{MemoryStore, SessionKey, SessionStore},
};

const LOGIN_BODY: &str = r#"{"access_token":"access-1","refresh_token":"refresh-1","user":{"id":1,"username":"admin","role":"admin"}}"#;
const EMPTY_PAGE: &str = r#"{"total":0,"items":[]}"#;

async fn seed(store: &MemoryStore, access: &str, refresh: Option<&str>) {
	store.set(SessionKey::AccessToken, access.into()).await.expect("Failed to seed access token.");
	store.set(SessionKey::UserRole, "admin".into()).await.expect("Failed to seed user role.");
	store.set(SessionKey::UserId, "1".into()).await.expect("Failed to seed user id.");

	if let Some(refresh) = refresh {
		store
			.set(SessionKey::RefreshToken, refresh.into())
			.await
			.expect("Failed to seed refresh token.");
	}
}

fn count_signals(client: &ReqwestTestClient) -> Arc<AtomicUsize> {
	let hits = Arc::new(AtomicUsize::new(0));
	let counter = hits.clone();

	client.unauthorized.subscribe(move || {
		counter.fetch_add(1, Ordering::SeqCst);
	});

	hits
}

#[tokio::test]
async fn login_then_expired_token_is_refreshed_transparently() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/login")
				.json_body(serde_json::json!({"username": "admin", "password": "secret"}));
			then.status(200).header("content-type", "application/json").body(LOGIN_BODY);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/clients/all_clients")
				.query_param("limit", "20")
				.query_param("offset", "0")
				.header("authorization", "Bearer access-2");
			then.status(200).header("content-type", "application/json").body(EMPTY_PAGE);
		})
		.await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/clients/all_clients").header("authorization", "Bearer access-1");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"detail":"Token expired"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/auth/refresh")
				.json_body(serde_json::json!({"refresh_token": "refresh-1"}));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"access-2","refresh_token":"refresh-2"}"#);
		})
		.await;
	let signals = count_signals(&client);

	client.login(&AdminLogin::new("admin", "secret")).await.expect("Login should succeed.");

	let page = client.clients(Pagination::default()).await.expect("Listing should recover.");

	login.assert_async().await;
	expired.assert_async().await;
	refresh.assert_async().await;
	fresh.assert_async().await;

	assert_eq!(page.total, 0);

	let snapshot = store.snapshot();

	assert_eq!(snapshot.get("access_token").map(String::as_str), Some("access-2"));
	assert_eq!(snapshot.get("refresh_token").map(String::as_str), Some("refresh-2"));
	assert_eq!(snapshot.get("user_role").map(String::as_str), Some("admin"));
	assert_eq!(snapshot.get("user_id").map(String::as_str), Some("1"));
	assert_eq!(signals.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_refresh_token_clears_session_and_signals_once() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let dashboard = server
		.mock_async(|when, then| {
			when.method(GET).path("/dashboard");
			then.status(401).body(r#"{"detail":"Not authenticated"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body(r#"{"access_token":"never"}"#);
		})
		.await;
	let signals = count_signals(&client);

	seed(&store, "access-1", None).await;

	let err = client.dashboard().await.expect_err("Dashboard call should fail.");

	dashboard.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
	assert_eq!(err.display_message(), "Not authenticated");
	assert!(store.is_empty());
	assert_eq!(signals.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_refresh_clears_session_without_retry() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let plans = server
		.mock_async(|when, then| {
			when.method(GET).path("/plans");
			then.status(401).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(400)
				.header("content-type", "application/json")
				.body(r#"{"detail":"Invalid refresh token"}"#);
		})
		.await;
	let signals = count_signals(&client);

	seed(&store, "access-1", Some("refresh-1")).await;

	let err = client.plans().await.expect_err("Plans call should fail.");

	plans.assert_calls_async(1).await;
	refresh.assert_calls_async(1).await;

	assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
	assert_eq!(err.display_message(), "Invalid refresh token");
	assert!(store.is_empty());
	assert!(client.default_authorization().is_none());
	assert_eq!(signals.load(Ordering::SeqCst), 1);
	assert_eq!(client.refresh_metrics.failures(), 1);
}

#[tokio::test]
async fn retried_request_that_fails_again_is_not_refreshed_twice() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let feedbacks = server
		.mock_async(|when, then| {
			when.method(GET).path("/feedbacks");
			then.status(401).body(r#"{"detail":"Forbidden for this role"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"access-2"}"#);
		})
		.await;
	let signals = count_signals(&client);

	seed(&store, "access-1", Some("refresh-1")).await;

	let err = client.feedbacks(Pagination::default()).await.expect_err("Retry should fail.");

	feedbacks.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;

	assert!(err.is_unauthorized());
	assert_eq!(store.snapshot().get("access_token").map(String::as_str), Some("access-2"));
	assert_eq!(store.snapshot().get("refresh_token").map(String::as_str), Some("refresh-1"));
	assert_eq!(signals.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn refresh_endpoint_401_is_never_refreshed() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(401).body("{}");
		})
		.await;

	seed(&store, "access-1", Some("refresh-1")).await;

	let err = client
		.post("/auth/refresh", &serde_json::json!({"refresh_token": "refresh-1"}))
		.await
		.expect_err("Refresh endpoint 401 should surface.");

	refresh.assert_calls_async(1).await;

	assert!(err.is_unauthorized());
	assert!(!store.is_empty());
	assert_eq!(client.unauthorized.emitted(), 0);
}

#[tokio::test]
async fn non_401_errors_pass_through() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/clients/create");
			then.status(422).header("content-type", "application/json").body(
				r#"{"detail":[{"loc":["body","phone"],"msg":"field required","type":"missing"}]}"#,
			);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body(r#"{"access_token":"never"}"#);
		})
		.await;

	seed(&store, "access-1", Some("refresh-1")).await;

	let err = client
		.create_client(&ClientCreate::new("Ali", ""))
		.await
		.expect_err("Validation failure should surface.");

	create.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
	assert_eq!(err.display_message(), "field required");
	assert_eq!(store.snapshot().len(), 4);
}

#[tokio::test]
async fn failed_login_surfaces_backend_detail() {
	let server = MockServer::start_async().await;
	let (client, store) = build_reqwest_test_client(&server.base_url());
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"detail":"Login yoki parol noto'g'ri"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).body(r#"{"access_token":"never"}"#);
		})
		.await;

	store.set(SessionKey::RefreshToken, "refresh-1".into()).await.expect("Seed should work.");

	let err = client
		.login(&AdminLogin::new("admin", "wrong"))
		.await
		.expect_err("Rejected login should surface.");

	login.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;

	assert_eq!(err.display_message(), "Login yoki parol noto'g'ri");
	assert!(!client.is_authenticated().await.expect("Store read should succeed."));
	assert_eq!(client.unauthorized.emitted(), 0);
}

#[tokio::test]
async fn shared_policy_refreshes_once_for_concurrent_failures() {
	let server = MockServer::start_async().await;
	let config = ClientConfig::builder()
		.base_url(server.base_url())
		.refresh_policy(RefreshPolicy::Shared)
		.build()
		.expect("Shared-policy config should build.");
	let (client, store) = build_reqwest_test_client_with(config);
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/prices/current").header("authorization", "Bearer access-2");
			then.status(200).header("content-type", "application/json").body(
				r#"{"pdf_old_price":40000,"book_old_price":100000,"pdf_price":50000,"book_price":120000}"#,
			);
		})
		.await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET).path("/prices/current").header("authorization", "Bearer access-1");
			then.status(401).body("{}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.delay(std::time::Duration::from_millis(100))
				.body(r#"{"access_token":"access-2"}"#);
		})
		.await;

	seed(&store, "access-1", Some("refresh-1")).await;

	let (first, second) = tokio::join!(client.current_prices(), client.current_prices());

	assert_eq!(first.expect("First call should recover.").pdf_price, 50000.);
	assert_eq!(second.expect("Second call should recover.").book_price, 120000.);

	refresh.assert_calls_async(1).await;
	expired.assert_calls_async(2).await;
	fresh.assert_calls_async(2).await;
}
