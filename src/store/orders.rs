use crate::domain::order::{Order, OrderUpdate};
use anyhow::{Context, Result};
use reqwest::StatusCode;

/// External order store. The reconciler never creates orders; it finds them
/// by the payment reference and applies at most one status patch per event.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Order>>;

    async fn update(&self, order_id: i64, update: &OrderUpdate) -> Result<Order>;
}

/// WooCommerce REST v3 client. References follow the checkout's `WC-{id}`
/// convention, so lookup is a direct order fetch after parsing the id out.
pub struct WooOrderStore {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl WooOrderStore {
    fn order_url(&self, order_id: i64) -> String {
        format!("{}/wp-json/wc/v3/orders/{}", self.base_url, order_id)
    }

    pub fn parse_reference(reference: &str) -> Option<i64> {
        reference.strip_prefix("WC-")?.parse::<i64>().ok()
    }
}

#[async_trait::async_trait]
impl OrderStore for WooOrderStore {
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Order>> {
        let Some(order_id) = Self::parse_reference(reference) else {
            return Ok(None);
        };

        let resp = self
            .client
            .get(self.order_url(order_id))
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .context("order lookup request failed")?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp
            .error_for_status()
            .context("order lookup returned an error status")?;
        let order: Order = resp.json().await.context("order lookup body is not an order")?;
        Ok(Some(order))
    }

    async fn update(&self, order_id: i64, update: &OrderUpdate) -> Result<Order> {
        let resp = self
            .client
            .put(self.order_url(order_id))
            .basic_auth(&self.consumer_key, Some(&self.consumer_secret))
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .json(update)
            .send()
            .await
            .context("order update request failed")?
            .error_for_status()
            .context("order update returned an error status")?;
        let order: Order = resp.json().await.context("order update body is not an order")?;
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_parses_to_order_id() {
        assert_eq!(WooOrderStore::parse_reference("WC-100"), Some(100));
        assert_eq!(WooOrderStore::parse_reference("WC-000417"), Some(417));
    }

    #[test]
    fn foreign_references_do_not_parse() {
        assert_eq!(WooOrderStore::parse_reference("ORDER-100"), None);
        assert_eq!(WooOrderStore::parse_reference("WC-"), None);
        assert_eq!(WooOrderStore::parse_reference("WC-abc"), None);
        assert_eq!(WooOrderStore::parse_reference(""), None);
    }
}
