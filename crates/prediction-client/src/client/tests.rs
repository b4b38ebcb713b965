//! Unit tests for client module.

use super::*;

// ============================================================================
// ClientConfig Tests
// ============================================================================

#[test]
fn test_client_config_default() {
    let config = ClientConfig::default();

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.timeout, Duration::from_secs(30));
}

#[test]
fn test_client_config_clone() {
    let config = ClientConfig {
        base_url: "http://test.com".to_string(),
        timeout: Duration::from_secs(10),
    };

    let cloned = config.clone();
    assert_eq!(cloned.base_url, config.base_url);
    assert_eq!(cloned.timeout, config.timeout);
}

// ============================================================================
// PredictionClient Creation Tests
// ============================================================================

#[test]
fn test_prediction_client_new() {
    let client = PredictionClient::new(ClientConfig::default());

    assert!(client.is_ok());
}

#[test]
fn test_prediction_client_base_url_trimmed() {
    let client = PredictionClient::with_base_url("http://localhost:8080/").unwrap();

    assert_eq!(client.base_url(), "http://localhost:8080");
}

#[test]
fn test_prediction_client_invalid_base_url() {
    let client = PredictionClient::with_base_url("localhost without scheme");

    assert!(matches!(client, Err(Error::InvalidUrl(_))));
}

// ============================================================================
// URL Building Tests
// ============================================================================

#[test]
fn test_data_url_without_params() {
    let client = PredictionClient::with_base_url("http://localhost:8080").unwrap();

    assert_eq!(
        client.data_url(&DataParams::new()).unwrap(),
        "http://localhost:8080/api/v1/data"
    );
}

#[test]
fn test_data_url_with_params() {
    let client = PredictionClient::with_base_url("http://localhost:8080").unwrap();
    let params = DataParams::new().page(3, 20).symbol("PTT");

    assert_eq!(
        client.data_url(&params).unwrap(),
        "http://localhost:8080/api/v1/data?limit=20&page=3&Symbol=PTT"
    );
}

#[test]
fn test_symbols_url_encodes_query() {
    let client = PredictionClient::with_base_url("http://localhost:8080").unwrap();

    assert_eq!(
        client.symbols_url(Some("ptt aot")).unwrap(),
        "http://localhost:8080/api/v1/symbols?query=ptt+aot"
    );
    assert_eq!(
        client.symbols_url(None).unwrap(),
        "http://localhost:8080/api/v1/symbols"
    );
}
