//! HTTP client for the remote inventory authority.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;

use shopkit_core::SkuCode;
use shopkit_inventory::StockStatus;
use shopkit_orders::{StockChecker, UnavailableError};

/// Stock checker backed by the inventory service's HTTP API.
///
/// The client itself carries a transport-level timeout; the coordinator
/// additionally bounds the whole lookup, so a hung connection can never hold
/// a placement request hostage.
pub struct HttpInventoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StockChecker for HttpInventoryClient {
    async fn check_stock(
        &self,
        sku_codes: &BTreeSet<SkuCode>,
    ) -> Result<HashMap<SkuCode, bool>, UnavailableError> {
        let url = format!("{}/inventory", self.base_url);
        let query: Vec<(&str, &str)> = sku_codes
            .iter()
            .map(|sku| ("sku_code", sku.as_str()))
            .collect();

        tracing::debug!(url = %url, skus = sku_codes.len(), "querying inventory authority");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| UnavailableError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UnavailableError(format!(
                "inventory service answered {}",
                response.status()
            )));
        }

        let statuses: Vec<StockStatus> = response
            .json()
            .await
            .map_err(|e| UnavailableError(format!("malformed inventory response: {e}")))?;

        Ok(statuses
            .into_iter()
            .map(|s| (s.sku_code, s.in_stock))
            .collect())
    }
}
