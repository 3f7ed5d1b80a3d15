use crate::core::provider::{FetchError, QuotationProvider};
use crate::core::quotation::QuotationEnvelope;
use async_trait::async_trait;
use tracing::{debug, error, instrument};

const USD_BRL_PATH: &str = "/json/last/USD-BRL";

/// Fetches the latest USD-BRL quotation from the AwesomeAPI economy endpoint.
///
/// The provider imposes no deadline of its own; callers bound it.
pub struct AwesomeApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl AwesomeApiProvider {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, USD_BRL_PATH)
    }
}

#[async_trait]
impl QuotationProvider for AwesomeApiProvider {
    #[instrument(name = "AwesomeApiFetch", skip(self))]
    async fn fetch_quotation(&self) -> Result<QuotationEnvelope, FetchError> {
        let url = self.url();
        debug!("Requesting quotation from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Body(e)
            }
        })?;

        match serde_json::from_slice::<QuotationEnvelope>(&body) {
            Ok(envelope) => {
                debug!(bid = %envelope.usd_brl.bid, "Decoded upstream quotation");
                Ok(envelope)
            }
            Err(e) => {
                error!(
                    error = ?e,
                    response = %String::from_utf8_lossy(&body),
                    "Failed to parse quotation response"
                );
                Err(FetchError::Decode(e))
            }
        }
    }
}
