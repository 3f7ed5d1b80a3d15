//! HTTP service exposing the latest quotation at `GET /cotacao`

pub mod error;

pub use error::ApiError;

use crate::core::config::ServerConfig;
use crate::core::provider::{FetchError, QuotationProvider};
use crate::core::quotation::Quotation;
use crate::core::repository::QuotationRepository;
use crate::providers::AwesomeApiProvider;
use crate::store::FjallQuotationStore;
use anyhow::{Context, Result};
use axum::{Json, Router, extract::State, routing::get};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument};

/// Dependencies shared by every request.
pub struct AppState {
    pub provider: Arc<dyn QuotationProvider>,
    pub repository: Arc<dyn QuotationRepository>,
    pub fetch_timeout: Duration,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn QuotationProvider>,
        repository: Arc<dyn QuotationRepository>,
        fetch_timeout: Duration,
    ) -> Self {
        AppState {
            provider,
            repository,
            fetch_timeout,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/cotacao", get(get_quotation))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /cotacao
///
/// Fetches, stores, then returns the quotation. Any failure aborts before the
/// next step runs.
#[instrument(name = "GetQuotation", skip_all)]
pub async fn get_quotation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Quotation>, ApiError> {
    match fetch_and_store(&state).await {
        Ok(quotation) => Ok(Json(quotation)),
        Err(e) => {
            error!(error = %e, status = %e.status(), "Quotation request failed");
            Err(e)
        }
    }
}

async fn fetch_and_store(state: &AppState) -> Result<Quotation, ApiError> {
    let envelope = tokio::time::timeout(state.fetch_timeout, state.provider.fetch_quotation())
        .await
        .map_err(|_| FetchError::Timeout)??;
    let quotation = envelope.usd_brl;

    let record = state.repository.save(&quotation).await?;
    info!(id = %record.id, bid = %quotation.bid, "Served quotation");

    Ok(quotation)
}

/// Wires the production dependencies and serves until the process stops.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent("cotacao/1.0")
        .build()
        .context("Failed to build HTTP client")?;
    let provider = AwesomeApiProvider::new(&config.upstream_base_url, client);
    let store = FjallQuotationStore::open(&config.database_path, config.store_timeout())
        .with_context(|| {
            format!(
                "Failed to open database at {}",
                config.database_path.display()
            )
        })?;

    let state = Arc::new(AppState::new(
        Arc::new(provider),
        Arc::new(store),
        config.fetch_timeout(),
    ));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    let port = listener.local_addr()?.port();
    info!("Start => http://localhost:{port}/cotacao");

    axum::serve(listener, create_router(state))
        .await
        .context("Server stopped unexpectedly")
}
