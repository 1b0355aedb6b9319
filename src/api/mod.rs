//! Marketplace API surface
//!
//! The remote server and its database are external collaborators; everything
//! the client knows about them is this HTTP-shaped contract. Tests drive the
//! same trait with an in-memory fake.

mod http;

pub use http::HttpApi;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::identity::{RequisitesPatch, UpsertUserRequest, UserRecord};
use crate::notifications::Notification;
use crate::orders::{CreateOrderRequest, Order, OrderStatus};

/// One method per server endpoint; the server stays authoritative on all
/// actor/state rules, client-side checks are advisory only.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// POST /users — upsert identity by external id
    async fn upsert_user(&self, request: UpsertUserRequest) -> ClientResult<UserRecord>;

    /// GET /users/{externalId}/orders — orders where the identity is seller or buyer
    async fn list_orders(&self, external_id: &str) -> ClientResult<Vec<Order>>;

    /// PUT /users/{externalId}/requisites — partial update of requisite fields
    async fn update_requisites(&self, external_id: &str, patch: RequisitesPatch)
        -> ClientResult<()>;

    /// GET /users/{externalId}/notifications — all notifications, not just unread
    async fn list_notifications(&self, external_id: &str) -> ClientResult<Vec<Notification>>;

    /// PUT /notifications/{id}/read — mark one notification consumed
    async fn mark_notification_read(&self, id: i64) -> ClientResult<()>;

    /// POST /orders — create an order; returns it with the generated code
    async fn create_order(&self, request: CreateOrderRequest) -> ClientResult<Order>;

    /// GET /orders/{code} — fetch an order by shareable code
    async fn get_order_by_code(&self, code: &str) -> ClientResult<Order>;

    /// PUT /orders/{id}/status — transition order status as the acting identity
    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        external_id: &str,
    ) -> ClientResult<Order>;

    /// POST /orders/{id}/join — attach a buyer to an unjoined active order
    async fn join_order(&self, order_id: i64, external_id: &str) -> ClientResult<()>;
}
