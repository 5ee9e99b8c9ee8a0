use std::time::Duration;

use httpmock::prelude::*;
use lazyfx::api::{OpenErClient, RateError, RateProvider};
use lazyfx::models::CurrencyCode;

fn rates_body() -> serde_json::Value {
    serde_json::json!({
        "result": "success",
        "base_code": "USD",
        "rates": { "USD": 1, "EUR": 0.92, "JPY": 151.3 }
    })
}

fn client(server: &MockServer) -> OpenErClient {
    OpenErClient::new(server.base_url()).unwrap()
}

#[tokio::test]
async fn test_currency_list_is_rates_key_set() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(rates_body());
        })
        .await;

    let mut currencies = client(&server).fetch_currency_list().await.unwrap();
    currencies.sort();

    api_mock.assert_async().await;
    let codes: Vec<&str> = currencies.iter().map(CurrencyCode::as_str).collect();
    assert_eq!(codes, vec!["EUR", "JPY", "USD"]);
}

#[tokio::test]
async fn test_currency_list_uses_configured_base() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/GBP");
            then.status(200).json_body(serde_json::json!({ "rates": { "GBP": 1, "CHF": 1.1 } }));
        })
        .await;

    let client = OpenErClient::with_options(
        server.base_url(),
        CurrencyCode::from("GBP"),
        Duration::from_secs(5),
    )
    .unwrap();

    let currencies = client.fetch_currency_list().await.unwrap();
    api_mock.assert_async().await;
    assert_eq!(currencies.len(), 2);
}

#[tokio::test]
async fn test_fetch_ratio_plucks_target_rate() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/EUR");
            then.status(200).json_body(serde_json::json!({ "rates": { "USD": 1.23 } }));
        })
        .await;

    let ratio = client(&server)
        .fetch_ratio(&CurrencyCode::from("EUR"), &CurrencyCode::from("USD"))
        .await;

    api_mock.assert_async().await;
    assert_eq!(ratio, Some(1.23));
}

#[tokio::test]
async fn test_fetch_ratio_missing_currency_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200).json_body(rates_body());
        })
        .await;

    let ratio = client(&server)
        .fetch_ratio(&CurrencyCode::from("USD"), &CurrencyCode::from("XYZ"))
        .await;
    assert_eq!(ratio, None);
}

#[tokio::test]
async fn test_null_rate_does_not_spoil_other_entries() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200)
                .header("Content-Type", "application/json")
                .body(r#"{"result":"success","rates":{"USD":1,"EUR":0.92,"XDR":null}}"#);
        })
        .await;

    let client = client(&server);

    // La clé XDR reste dans la liste malgré sa valeur null
    let mut currencies = client.fetch_currency_list().await.unwrap();
    currencies.sort();
    let codes: Vec<&str> = currencies.iter().map(CurrencyCode::as_str).collect();
    assert_eq!(codes, vec!["EUR", "USD", "XDR"]);

    let usd = CurrencyCode::from("USD");
    assert_eq!(client.fetch_ratio(&usd, &CurrencyCode::from("EUR")).await, Some(0.92));

    // Seul le ratio vers XDR est indisponible
    assert_eq!(client.fetch_ratio(&usd, &CurrencyCode::from("XDR")).await, None);

    api_mock.assert_hits_async(3).await;
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(503).body("maintenance");
        })
        .await;

    let client = client(&server);
    let err = client.latest(&CurrencyCode::from("USD")).await.unwrap_err();
    match err {
        RateError::Http { status } => assert_eq!(status.as_u16(), 503),
        other => panic!("expected Http error, got {:?}", other),
    }

    // Les deux opérations s'effondrent en None
    assert!(client.fetch_currency_list().await.is_none());
    assert!(client
        .fetch_ratio(&CurrencyCode::from("USD"), &CurrencyCode::from("EUR"))
        .await
        .is_none());
}

#[tokio::test]
async fn test_unsupported_code_is_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/XXX");
            then.status(404)
                .json_body(serde_json::json!({ "result": "error", "error-type": "unsupported-code" }));
        })
        .await;

    let err = client(&server).latest(&CurrencyCode::from("XXX")).await.unwrap_err();
    assert!(matches!(err, RateError::Http { .. }));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let client = client(&server);
    let err = client.latest(&CurrencyCode::from("USD")).await.unwrap_err();
    assert!(matches!(err, RateError::Parse(_)));
    assert!(client.fetch_currency_list().await.is_none());
}

#[tokio::test]
async fn test_empty_rates_fails_currency_list() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200).json_body(serde_json::json!({ "result": "success", "rates": {} }));
        })
        .await;

    assert!(client(&server).fetch_currency_list().await.is_none());
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Port 1 : rien n'écoute, connexion refusée
    let client = OpenErClient::with_options(
        "http://127.0.0.1:1",
        CurrencyCode::from("USD"),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.latest(&CurrencyCode::from("USD")).await.unwrap_err();
    assert!(matches!(err, RateError::Network(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/latest/USD");
            then.status(200)
                .delay(Duration::from_secs(2))
                .json_body(rates_body());
        })
        .await;

    let client = OpenErClient::with_options(
        server.base_url(),
        CurrencyCode::from("USD"),
        Duration::from_millis(200),
    )
    .unwrap();

    let err = client.latest(&CurrencyCode::from("USD")).await.unwrap_err();
    match err {
        RateError::Network(source) => assert!(source.is_timeout()),
        other => panic!("expected Network error, got {:?}", other),
    }
}
