//! HTTP implementation of OrderStatusSource.
//!
//! Queries the order status endpoint the server exposes, so the poller can
//! run in a different process from the order store.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::ports::OrderStatusSource;

/// Reads order status over HTTP from the checkout API.
pub struct HttpOrderStatusSource {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpOrderStatusSource {
    /// Create a source pointing at the given API base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderStatusResponse {
    is_paid: bool,
}

#[async_trait]
impl OrderStatusSource for HttpOrderStatusSource {
    async fn is_paid(&self, id: &OrderId) -> Result<bool, DomainError> {
        let url = format!("{}/api/orders/{}/status", self.base_url, id);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Status request failed: {}", e),
            )
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::new(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", id),
            ));
        }
        if !status.is_success() {
            return Err(DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Status endpoint returned {}", status),
            ));
        }

        let body: OrderStatusResponse = response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Invalid status response: {}", e),
            )
        })?;

        Ok(body.is_paid)
    }
}
