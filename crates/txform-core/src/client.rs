//! Calculation backend client
//!
//! The backend is reached through the `CalculationBackend` trait so the
//! controller can be driven by an in-process fake in tests. The production
//! implementation posts JSON over HTTP with reqwest.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::models::{CalculationRequest, CalculationResponse};

/// Anything that can turn a request into a calculation response
#[async_trait]
pub trait CalculationBackend: Send + Sync {
    /// Send one request and interpret the answer.
    ///
    /// Transport and parse failures are errors; a backend-reported problem is
    /// `CalculationResponse::Error`.
    async fn process(&self, request: &CalculationRequest) -> CoreResult<CalculationResponse>;
}

/// Backend reference type
pub type BackendRef = Arc<dyn CalculationBackend>;

/// HTTP calculation backend
#[derive(Debug, Clone)]
pub struct HttpCalculationBackend {
    client: reqwest::Client,
    endpoint_url: String,
}

impl HttpCalculationBackend {
    /// Create a backend posting to `endpoint_url`.
    ///
    /// No timeout is set; a request waits as long as the backend takes.
    pub fn new(endpoint_url: &str) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::ClientInit { message: e.to_string() })?;

        Ok(Self {
            client,
            endpoint_url: endpoint_url.to_string(),
        })
    }
}

#[async_trait]
impl CalculationBackend for HttpCalculationBackend {
    async fn process(&self, request: &CalculationRequest) -> CoreResult<CalculationResponse> {
        debug!(
            "[Backend] POST {} ({} transactions)",
            self.endpoint_url,
            request.transactions.len()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .json(request)
            .send()
            .await
            .map_err(|e| CoreError::Transport {
                message: format!("Failed to reach calculation backend: {}", e),
            })?;

        // The status is not inspected; only the body decides the outcome.
        let status = response.status();
        let text = response.text().await.map_err(|e| CoreError::Transport {
            message: format!("Failed to read backend response: {}", e),
        })?;
        debug!("[Backend] {} returned {} ({} bytes)", self.endpoint_url, status, text.len());

        CalculationResponse::from_json(&text)
    }
}
