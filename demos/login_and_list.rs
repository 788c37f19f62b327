//! Signs in against a mocked admin backend, lets the access token expire, and shows the client
//! refreshing it transparently before listing clients.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use magazine365_api::{
	api::Pagination,
	auth::AdminLogin,
	client::ApiClient,
	config::ClientConfig,
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/login");
			then.status(200).header("content-type", "application/json").body(
				r#"{"access_token":"demo-access-1","refresh_token":"demo-refresh","user":{"id":1,"username":"admin","role":"admin"}}"#,
			);
		})
		.await;
	let expired = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/clients/all_clients")
				.header("authorization", "Bearer demo-access-1");
			then.status(401).body(r#"{"detail":"Token expired"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"demo-access-2"}"#);
		})
		.await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/clients/all_clients")
				.header("authorization", "Bearer demo-access-2");
			then.status(200).header("content-type", "application/json").body(
				r#"{"total":1,"items":[{"id":1,"fullname":"Aziza Karimova","phone":"+998901234567","conversation_file":null,"created_at":"2025-01-02T10:00:00","updated_at":"2025-01-02T10:00:00","orders_count":2,"reservations_count":0,"followups_count":1,"feedbacks_count":1}]}"#,
			);
		})
		.await;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let config = ClientConfig::builder().base_url(server.base_url()).build()?;
	let client = ApiClient::new(config, store);

	client.unauthorized.subscribe(|| println!("Session ended; redirect to the login screen."));

	let session = client.login(&AdminLogin::new("admin", "secret")).await?;

	println!("Signed in as {} ({}).", session.user.username, session.user.role);

	let page = client.clients(Pagination::default()).await?;

	for row in &page.items {
		println!("#{} {} {} orders={}", row.id, row.fullname, row.phone, row.orders_count);
	}

	println!(
		"Refresh exchanges: {} attempted, {} succeeded.",
		client.refresh_metrics.attempts(),
		client.refresh_metrics.successes()
	);

	login.assert_async().await;
	expired.assert_async().await;
	refresh.assert_async().await;
	listing.assert_async().await;

	Ok(())
}
