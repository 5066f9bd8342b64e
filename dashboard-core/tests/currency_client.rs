use dashboard_core::{ClientError, CurrencyClient, RateProvider};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn client_for(server: &MockServer) -> CurrencyClient {
    CurrencyClient::with_base_url("TEST_KEY".into(), format!("{}/v6", server.uri()))
}

/// Address of a port that was just released, so connecting to it is refused.
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

async fn mount_rate(server: &MockServer, from: &str, to: &str, rate: f64) {
    Mock::given(method("GET"))
        .and(path(format!("/v6/TEST_KEY/pair/{from}/{to}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "base_code": from,
            "target_code": to,
            "conversion_rate": rate
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn exchange_rate_is_returned_on_success() {
    let server = MockServer::start().await;
    mount_rate(&server, "USD", "EUR", 0.9234).await;

    let rate = client_for(&server).get_exchange_rate("USD", "EUR").await;
    assert_eq!(rate, Some(0.9234));
}

#[tokio::test]
async fn conversion_is_rounded_to_two_decimals() {
    let server = MockServer::start().await;
    mount_rate(&server, "USD", "EUR", 0.9234).await;
    mount_rate(&server, "GBP", "JPY", 191.123456).await;

    let client = client_for(&server);

    let result = client.convert_currency(100.0, "USD", "EUR").await.expect("conversion");
    assert_eq!(result.converted, 92.34);
    assert_eq!(result.rate, 0.9234);
    assert_eq!(result.amount, 100.0);
    assert_eq!(result.from_currency, "USD");
    assert_eq!(result.to_currency, "EUR");

    let result = client.convert_currency(12.345, "GBP", "JPY").await.expect("conversion");
    assert_eq!(result.converted, 2359.42);
    assert_eq!(result.rate, 191.123456);
}

#[tokio::test]
async fn remote_error_is_absent_not_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v6/TEST_KEY/pair/USD/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "error",
            "error-type": "unsupported-code"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_exchange_rate("USD", "XYZ").await, None);
    assert!(client.convert_currency(100.0, "USD", "XYZ").await.is_none());

    match client.fetch_exchange_rate("USD", "XYZ").await {
        Err(ClientError::Remote { kind }) => assert_eq!(kind, "unsupported-code"),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn not_found_yields_no_conversion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v6/TEST_KEY/pair/USD/XYZ"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).convert_currency(100.0, "USD", "XYZ").await;
    assert!(result.is_none());
}

#[tokio::test]
async fn every_call_fetches_a_fresh_rate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v6/TEST_KEY/pair/EUR/PLN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "conversion_rate": 4.3
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.get_exchange_rate("EUR", "PLN").await;
    client.get_exchange_rate("EUR", "PLN").await;
    client.convert_currency(1.0, "EUR", "PLN").await;
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_key() {
    let client = CurrencyClient::with_base_url("SECRET_KEY".into(), format!("{}/v6", closed_port_uri()));
    let err = client.fetch_exchange_rate("USD", "EUR").await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!err.to_string().contains("SECRET_KEY"));
    assert_eq!(client.get_exchange_rate("USD", "EUR").await, None);
}

#[tokio::test]
async fn zero_rate_yields_no_conversion() {
    let server = MockServer::start().await;
    mount_rate(&server, "USD", "XXX", 0.0).await;

    let client = client_for(&server);
    assert_eq!(client.get_exchange_rate("USD", "XXX").await, None);
    assert!(client.convert_currency(100.0, "USD", "XXX").await.is_none());
}
