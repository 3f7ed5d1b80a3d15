//! One-shot client: asks the service for the quotation and writes the bid to a file

use crate::core::config::ClientConfig;
use crate::core::quotation::ClientResult;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to quotation service failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("quotation service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("quotation service answered with status {0}")]
    Status(u16),

    #[error("failed to read quotation service response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse quotation service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to write quotation file: {0}")]
    Io(#[from] std::io::Error),
}

/// Line written to the output file for a given bid.
pub fn format_bid(bid: &str) -> String {
    format!("Dólar:  {bid}")
}

/// Requests the quotation from `url`, giving the whole exchange `timeout`.
#[instrument(name = "FetchBid", skip(client))]
pub async fn fetch_bid(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<ClientResult, ClientError> {
    let classify = |e: reqwest::Error, wrap: fn(reqwest::Error) -> ClientError| {
        if e.is_timeout() {
            ClientError::Timeout(timeout)
        } else {
            wrap(e)
        }
    };

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify(e, ClientError::Request))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| classify(e, ClientError::Body))?;
    debug!(len = body.len(), "Received quotation response");

    Ok(serde_json::from_slice(&body)?)
}

/// Creates or truncates `path` with the formatted bid.
pub fn write_quotation_file(path: &Path, result: &ClientResult) -> Result<(), ClientError> {
    std::fs::write(path, format_bid(&result.bid))?;
    Ok(())
}

/// Fetches the bid and writes it out. The file is untouched on any failure.
pub async fn run(config: &ClientConfig) -> Result<ClientResult, ClientError> {
    let client = reqwest::Client::new();
    let result = fetch_bid(&client, &config.server_url, config.timeout()).await?;
    write_quotation_file(&config.output_path, &result)?;
    info!(bid = %result.bid, path = %config.output_path.display(), "Wrote quotation file");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SERVICE_JSON: &str = r#"{"code":"USD","codein":"BRL","name":"Dólar Americano/Real Brasileiro","high":"5.4610","low":"5.4020","varBid":"0.0100","pctChange":"0.18","bid":"5.43","ask":"5.4310","timestamp":"1718301600","create_date":"2024-06-13 15:00:00"}"#;

    async fn create_mock_service(template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cotacao"))
            .respond_with(template)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn config_for(server: &MockServer, output_dir: &Path) -> ClientConfig {
        ClientConfig {
            server_url: format!("{}/cotacao", server.uri()),
            timeout_ms: 300,
            output_path: output_dir.join("cotacao.txt"),
        }
    }

    #[test]
    fn test_format_bid() {
        assert_eq!(format_bid("5.43"), "Dólar:  5.43");
    }

    #[tokio::test]
    async fn test_run_writes_bid_file() {
        let mock_server =
            create_mock_service(ResponseTemplate::new(200).set_body_string(SERVICE_JSON)).await;
        let dir = tempdir().unwrap();
        let config = config_for(&mock_server, dir.path());

        let result = run(&config).await.unwrap();

        assert_eq!(result.bid, "5.43");
        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(written, "Dólar:  5.43");
    }

    #[tokio::test]
    async fn test_run_overwrites_existing_file() {
        let mock_server =
            create_mock_service(ResponseTemplate::new(200).set_body_string(SERVICE_JSON)).await;
        let dir = tempdir().unwrap();
        let config = config_for(&mock_server, dir.path());
        std::fs::write(&config.output_path, "Dólar:  4.99 and some older, longer text").unwrap();

        run(&config).await.unwrap();

        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(written, "Dólar:  5.43");
    }

    #[tokio::test]
    async fn test_slow_service_times_out_and_leaves_file_untouched() {
        let mock_server = create_mock_service(
            ResponseTemplate::new(200)
                .set_body_string(SERVICE_JSON)
                .set_delay(Duration::from_millis(600)),
        )
        .await;
        let dir = tempdir().unwrap();
        let config = config_for(&mock_server, dir.path());
        std::fs::write(&config.output_path, "previous").unwrap();

        let result = run(&config).await;

        assert!(matches!(result, Err(ClientError::Timeout(_))));
        let written = std::fs::read_to_string(&config.output_path).unwrap();
        assert_eq!(written, "previous");
    }

    #[tokio::test]
    async fn test_empty_body_is_decode_error_and_no_file() {
        let mock_server = create_mock_service(ResponseTemplate::new(200)).await;
        let dir = tempdir().unwrap();
        let config = config_for(&mock_server, dir.path());

        let result = run(&config).await;

        assert!(matches!(result, Err(ClientError::Decode(_))));
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_error_status_is_failure_and_no_file() {
        let mock_server = create_mock_service(ResponseTemplate::new(502)).await;
        let dir = tempdir().unwrap();
        let config = config_for(&mock_server, dir.path());

        let result = run(&config).await;

        assert!(matches!(result, Err(ClientError::Status(502))));
        assert!(!config.output_path.exists());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        let dir = tempdir().unwrap();
        let config = ClientConfig {
            server_url: "http://127.0.0.1:1/cotacao".to_string(),
            timeout_ms: 300,
            output_path: dir.path().join("cotacao.txt"),
        };

        let result = run(&config).await;

        assert!(matches!(result, Err(ClientError::Request(_))));
        assert!(!config.output_path.exists());
    }
}
