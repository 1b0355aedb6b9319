//! Client-side order cache
//!
//! The cache has no invalidation mechanism of its own: it is replaced
//! wholesale on every refresh, and callers refresh after every mutating
//! action and after every applied notification. Concurrent refreshes race;
//! the last response to land wins.

use tokio::sync::RwLock;

use crate::api::MarketApi;
use crate::error::ClientResult;
use crate::orders::Order;

#[derive(Default)]
pub struct OrderRepository {
    cache: RwLock<Vec<Order>>,
}

impl OrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch all orders where the identity is seller or buyer and replace the
    /// cache wholesale. Returns the number of cached orders.
    pub async fn refresh(&self, api: &dyn MarketApi, external_id: &str) -> ClientResult<usize> {
        let orders = api.list_orders(external_id).await?;
        let count = orders.len();
        *self.cache.write().await = orders;
        tracing::debug!(count, "Order cache refreshed");
        Ok(count)
    }

    pub async fn all(&self) -> Vec<Order> {
        self.cache.read().await.clone()
    }

    pub async fn get(&self, order_id: i64) -> Option<Order> {
        self.cache
            .read()
            .await
            .iter()
            .find(|order| order.id == order_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}
