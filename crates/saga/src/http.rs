//! HTTP inventory gateway backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use common::ItemId;
use inventory::Item;
use reqwest::StatusCode;

use crate::gateway::{GatewayError, InventoryGateway};

/// Per-request timeout on gateway calls. The saga's overall deadline is
/// separate and usually longer.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Inventory gateway that talks to the inventory service over HTTP.
#[derive(Clone)]
pub struct HttpInventoryGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryGateway {
    /// Creates a gateway for the inventory service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}/items/{}", self.base_url, id)
    }

    async fn decode_item(resp: reqwest::Response) -> Result<Item, GatewayError> {
        resp.json::<Item>()
            .await
            .map_err(|e| GatewayError::Unavailable(format!("invalid inventory response: {e}")))
    }

    async fn rejection_message(resp: reqwest::Response) -> String {
        // Error responses carry {"error": "..."}; fall back to the status.
        let status = resp.status();
        resp.json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| format!("inventory returned {status}"))
    }
}

#[async_trait]
impl InventoryGateway for HttpInventoryGateway {
    async fn fetch_item(&self, id: ItemId) -> Result<Item, GatewayError> {
        let resp = self
            .client
            .get(self.item_url(id))
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => Self::decode_item(resp).await,
            StatusCode::NOT_FOUND => Err(GatewayError::NotFound(id)),
            s if s.is_server_error() => {
                Err(GatewayError::Unavailable(Self::rejection_message(resp).await))
            }
            _ => Err(GatewayError::Rejected(Self::rejection_message(resp).await)),
        }
    }

    async fn adjust(&self, id: ItemId, delta: i64) -> Result<Item, GatewayError> {
        let resp = self
            .client
            .post(format!("{}/adjust", self.item_url(id)))
            .json(&serde_json::json!({ "delta": delta }))
            .send()
            .await
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => Self::decode_item(resp).await,
            s if s.is_server_error() => {
                Err(GatewayError::Unavailable(Self::rejection_message(resp).await))
            }
            // 400 covers both unknown id and insufficient stock under the
            // inventory service's adjust contract.
            _ => Err(GatewayError::Rejected(Self::rejection_message(resp).await)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let gateway = HttpInventoryGateway::new("http://inventory:8001/").unwrap();
        assert_eq!(gateway.item_url(ItemId::new(3)), "http://inventory:8001/items/3");
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // Reserved TEST-NET address; nothing listens there.
        let gateway = HttpInventoryGateway::new("http://192.0.2.1:1").unwrap();
        let err = gateway.fetch_item(ItemId::new(1)).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
    }
}
