#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use magazine365_api::{
	_preludet::*,
	api::{Pagination, PdfChannelCreate, PlanInput, ReservationQuery, UpdateOrder},
	store::{SessionKey, SessionStore},
};

async fn signed_in(server: &MockServer) -> ReqwestTestClient {
	let (client, store) = build_reqwest_test_client(&server.base_url());

	store.set(SessionKey::AccessToken, "access-1".into()).await.expect("Failed to seed token.");
	store.set(SessionKey::RefreshToken, "refresh-1".into()).await.expect("Failed to seed token.");

	client
}

#[tokio::test]
async fn feedbacks_are_paged_with_bearer() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/feedbacks")
				.query_param("limit", "50")
				.query_param("offset", "100")
				.header("authorization", "Bearer access-1");
			then.status(200).header("content-type", "application/json").body(
				r#"{"total":101,"items":[{"id":101,"content":"Rahmat!","created_at":"2025-01-05T08:00:00"}]}"#,
			);
		})
		.await;
	let page = client.feedbacks(Pagination::new(50, 100)).await.expect("Feedbacks should load.");

	mock.assert_async().await;

	assert_eq!(page.total, 101);
	assert_eq!(page.items[0].content, "Rahmat!");
}

#[tokio::test]
async fn reservations_accept_wrapped_payloads() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/reservations")
				.query_param("status", "active")
				.query_param("limit", "10")
				.query_param("offset", "0");
			then.status(200).header("content-type", "application/json").body(
				r#"{"items":[{"id":1,"user_id":42,"fullname":"Bek","phone":"+99890","reserved_until":"2025-02-01T00:00:00","payment_reminder_sent":1,"status":"active","created_at":"t","updated_at":"t"}]}"#,
			);
		})
		.await;
	let rows = client
		.reservations(&ReservationQuery::default().status("active").page(10, 0))
		.await
		.expect("Reservations should load.");

	mock.assert_async().await;

	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].payment_reminder_sent, 1);
}

#[tokio::test]
async fn pdf_channel_lifecycle() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let channel = r#"{"id":9,"channel_name":"Fevral","channel_month":"2025-02","channel_link":"https://t.me/+abc","is_active":true,"created_at":"t"}"#;
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/pdf-channels").json_body(serde_json::json!({
				"channel_name": "Fevral",
				"channel_month": "2025-02",
				"channel_link": "https://t.me/+abc"
			}));
			then.status(201).header("content-type", "application/json").body(channel);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/pdf-channels/9");
			then.status(204);
		})
		.await;
	let created = client
		.create_pdf_channel(&PdfChannelCreate {
			channel_name: "Fevral".into(),
			channel_month: "2025-02".into(),
			channel_link: "https://t.me/+abc".into(),
			is_active: None,
		})
		.await
		.expect("Channel creation should succeed.");

	client.delete_pdf_channel(created.id).await.expect("Channel deletion should succeed.");

	create.assert_async().await;
	delete.assert_async().await;
}

#[tokio::test]
async fn plan_export_downloads_bytes_and_filename() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/plans/3/export-excel");
			then.status(200)
				.header(
					"content-type",
					"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
				)
				.header("content-disposition", "attachment; filename=\"plan_2025-03.xlsx\"")
				.body(b"PK\x03\x04");
		})
		.await;
	let export = client.export_plan_excel(3).await.expect("Export should succeed.");

	mock.assert_async().await;

	assert_eq!(export.filename, "plan_2025-03.xlsx");
	assert_eq!(export.bytes, b"PK\x03\x04");
}

#[tokio::test]
async fn plan_create_sends_derived_totals() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/plans").json_body(serde_json::json!({
				"month": "2025-04",
				"total_lead": 250,
				"pdf": {"new_pdf_total": 30, "old_pdf_total": 20, "pdf_total": 50}
			}));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":5,"month":"2025-04","total_lead":250,"pdf":{"new_pdf_total":30,"old_pdf_total":20,"pdf_total":50},"book":null}"#);
		})
		.await;
	let plan = client
		.create_plan(&PlanInput::new("2025-04", 250).pdf(30, 20))
		.await
		.expect("Plan creation should succeed.");

	mock.assert_async().await;

	assert_eq!(plan.pdf.pdf_total, 50);
	assert_eq!(plan.book.book_total, 0);
}

#[tokio::test]
async fn order_update_is_partial() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/clients/order/31")
				.json_body(serde_json::json!({"status": "delivered"}));
			then.status(200).header("content-type", "application/json").body(r#"{"id":31}"#);
		})
		.await;

	client
		.update_order(31, &UpdateOrder::default().status("delivered"))
		.await
		.expect("Order update should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn conversations_list_and_detail() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET).path("/conversations");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"["conversations/998901112233.json"]"#);
		})
		.await;
	let detail = server
		.mock_async(|when, then| {
			when.method(GET).path("/conversations/998901112233.json");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"messages":[{"from":"bot","text":"Assalomu alaykum"}]}"#);
		})
		.await;
	let names = client.conversations().await.expect("Conversation list should load.");
	let transcript = client.conversation(&names[0]).await.expect("Transcript should load.");

	list.assert_async().await;
	detail.assert_async().await;

	assert_eq!(transcript["messages"][0]["from"], "bot");
}

#[tokio::test]
async fn current_prices_round_trip() {
	let server = MockServer::start_async().await;
	let client = signed_in(&server).await;
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path("/prices/current");
			then.status(200).header("content-type", "application/json").body(
				r#"{"pdf_old_price":40000,"book_old_price":100000,"pdf_price":50000,"book_price":120000}"#,
			);
		})
		.await;
	let write = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/prices")
				.query_param("pdf_price", "55000")
				.query_param("book_price", "120000")
				.query_param("pdf_old_price", "40000")
				.query_param("book_old_price", "100000");
			then.status(200).header("content-type", "text/plain").body("OK");
		})
		.await;
	let mut prices = client.current_prices().await.expect("Prices should load.");

	prices.pdf_price = 55000.;

	let message = client.set_prices(&prices).await.expect("Price update should succeed.");

	read.assert_async().await;
	write.assert_async().await;

	assert_eq!(message, "OK");
}
