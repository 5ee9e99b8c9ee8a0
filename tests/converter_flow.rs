use std::sync::Arc;

use httpmock::prelude::*;
use lazyfx::api::{OpenErClient, RateProvider};
use lazyfx::converter::Converter;
use lazyfx::models::CurrencyCode;
use tokio::runtime::Handle;

fn converter(server: &MockServer) -> Converter {
    let client: Arc<dyn RateProvider> = Arc::new(OpenErClient::new(server.base_url()).unwrap());
    Converter::new(client, Handle::current())
}

#[tokio::test]
async fn test_initialize_then_pick_from_currency() {
    let server = MockServer::start_async().await;
    let list_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200).json_body(serde_json::json!({
                "result": "success",
                "rates": { "USD": 1, "EUR": 0.92, "JPY": 151.3 }
            }));
        })
        .await;
    let ratio_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/EUR");
            then.status(200).json_body(serde_json::json!({
                "result": "success",
                "rates": { "EUR": 1, "USD": 1.08, "JPY": 164.4 }
            }));
        })
        .await;

    let converter = converter(&server);

    converter.initialize().await.unwrap();
    let state = converter.snapshot();
    let codes: Vec<&str> = state.currencies.iter().map(CurrencyCode::as_str).collect();
    assert_eq!(codes, vec!["EUR", "JPY", "USD"]);

    // to = USD d'abord (ratio USD -> USD servi par le mock /latest/USD)
    converter.set_to_currency(CurrencyCode::from("USD")).await.unwrap();
    converter.set_from_currency(CurrencyCode::from("EUR")).await.unwrap();

    let state = converter.snapshot();
    assert_eq!(state.ratio, 1.08);
    assert_eq!(state.pending_requests, 0);

    converter.set_amount("10");
    assert!((converter.snapshot().result() - 10.8).abs() < 1e-9);

    list_mock.assert_hits_async(2).await;
    ratio_mock.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_upstream_failure_leaves_state_unchanged() {
    let server = MockServer::start_async().await;
    let mut ok_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200).json_body(serde_json::json!({ "rates": { "USD": 1, "EUR": 0.5 } }));
        })
        .await;

    let converter = converter(&server);
    converter.initialize().await.unwrap();
    converter.set_to_currency(CurrencyCode::from("EUR")).await.unwrap();
    let before = converter.snapshot();
    assert_eq!(before.ratio, 0.5);

    // Le serveur tombe : liste et ratio restent ceux d'avant
    ok_mock.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(500);
        })
        .await;

    converter.initialize().await.unwrap();
    converter.set_to_currency(CurrencyCode::from("EUR")).await.unwrap();

    let after = converter.snapshot();
    assert_eq!(after.currencies, before.currencies);
    assert_eq!(after.ratio, 0.5);
    assert_eq!(after.last_updated, before.last_updated);
}

#[tokio::test]
async fn test_set_amount_twice_makes_no_request() {
    let server = MockServer::start_async().await;
    let any_mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(serde_json::json!({ "rates": { "EUR": 0.9 } }));
        })
        .await;

    let converter = converter(&server);
    converter.set_amount("42");
    converter.set_amount("42");

    let state = converter.snapshot();
    assert_eq!(state.amount_text, "42");
    assert_eq!(state.ratio, 1.0);
    assert_eq!(any_mock.hits_async().await, 0);
}
