//! Shared test fixtures: an in-memory marketplace server and a client harness
//!
//! `FakeServer` implements the `MarketApi` contract with the same semantics
//! the real server enforces (authoritative role/state checks, notification
//! fan-out, stats aggregation), so the whole client stack can be exercised
//! without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use giftmarket_client::api::MarketApi;
use giftmarket_client::config::Config;
use giftmarket_client::error::{ClientError, ClientResult};
use giftmarket_client::identity::{
    Identity, IdentityService, RequisitesPatch, UpsertUserRequest, UserRecord,
};
use giftmarket_client::notifications::{Notification, NotificationKind, NotificationReconciler};
use giftmarket_client::orders::{
    CreateOrderRequest, Currency, DeepLinkResolver, Order, OrderService, OrderStatus,
};
use giftmarket_client::state::Session;

#[derive(Debug, Clone, Default)]
struct UserRow {
    id: i64,
    external_id: String,
    display_name: String,
    is_admin: bool,
    wallet_address: Option<String>,
    card_number: Option<String>,
    card_bank: Option<String>,
    card_currency: Option<Currency>,
    platform_handle: Option<String>,
    completed_deals: u32,
    volumes: HashMap<Currency, f64>,
}

impl UserRow {
    fn record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            external_id: self.external_id.clone(),
            display_name: self.display_name.clone(),
            is_admin: self.is_admin,
            wallet_address: self.wallet_address.clone(),
            card_number: self.card_number.clone(),
            card_bank: self.card_bank.clone(),
            card_currency: self.card_currency,
            platform_handle: self.platform_handle.clone(),
            completed_deals: self.completed_deals,
            volumes: self.volumes.clone(),
        }
    }
}

#[derive(Default)]
struct ServerState {
    users: Vec<UserRow>,
    orders: Vec<Order>,
    notifications: Vec<Notification>,
    admins: Vec<String>,
    acked: Vec<i64>,
}

impl ServerState {
    fn user_by_external(&self, external_id: &str) -> Option<&UserRow> {
        self.users.iter().find(|u| u.external_id == external_id)
    }

    fn notify(&mut self, recipient_external_id: &str, kind: NotificationKind, message: String) {
        let id = self.notifications.len() as i64 + 1;
        self.notifications.push(Notification {
            id,
            recipient_external_id: recipient_external_id.to_string(),
            kind,
            message,
            read: false,
        });
    }
}

/// In-memory stand-in for the remote marketplace server
#[derive(Default)]
pub struct FakeServer {
    state: Mutex<ServerState>,
    /// When set, mark-read calls fail with a network error
    pub fail_acks: AtomicBool,
    /// Artificial latency for notification listing, in milliseconds
    pub list_delay_ms: AtomicU64,
    /// Number of notification-listing calls served
    pub list_calls: AtomicUsize,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Grant the server-side admin role claim to an external id
    pub async fn grant_admin(&self, external_id: &str) {
        let mut state = self.state.lock().await;
        state.admins.push(external_id.to_string());
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.external_id == external_id)
        {
            user.is_admin = true;
        }
    }

    /// Inject a notification directly, returning its id
    pub async fn push_notification(
        &self,
        recipient_external_id: &str,
        kind: NotificationKind,
        message: &str,
    ) -> i64 {
        let mut state = self.state.lock().await;
        state.notify(recipient_external_id, kind, message.to_string());
        state.notifications.len() as i64
    }

    /// Overwrite a user's server-side aggregates
    pub async fn set_stats(
        &self,
        external_id: &str,
        completed_deals: u32,
        volumes: HashMap<Currency, f64>,
    ) {
        let mut state = self.state.lock().await;
        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.external_id == external_id)
        {
            user.completed_deals = completed_deals;
            user.volumes = volumes;
        }
    }

    pub async fn order(&self, order_id: i64) -> Option<Order> {
        self.state
            .lock()
            .await
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
    }

    pub async fn acked(&self) -> Vec<i64> {
        self.state.lock().await.acked.clone()
    }

    pub async fn unread_count(&self, recipient_external_id: &str) -> usize {
        self.state
            .lock()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient_external_id == recipient_external_id && !n.read)
            .count()
    }
}

#[async_trait]
impl MarketApi for FakeServer {
    async fn upsert_user(&self, request: UpsertUserRequest) -> ClientResult<UserRecord> {
        let mut state = self.state.lock().await;
        let is_admin = state.admins.contains(&request.external_id);

        if let Some(user) = state
            .users
            .iter_mut()
            .find(|u| u.external_id == request.external_id)
        {
            user.is_admin = is_admin;
            return Ok(user.record());
        }

        let user = UserRow {
            id: state.users.len() as i64 + 1,
            external_id: request.external_id,
            display_name: request.display_name,
            is_admin,
            ..Default::default()
        };
        let record = user.record();
        state.users.push(user);
        Ok(record)
    }

    async fn list_orders(&self, external_id: &str) -> ClientResult<Vec<Order>> {
        let state = self.state.lock().await;
        let user = state
            .user_by_external(external_id)
            .ok_or_else(|| ClientError::NotFound("User not found".to_string()))?;
        Ok(state
            .orders
            .iter()
            .filter(|o| o.seller_id == user.id || o.buyer_id == Some(user.id))
            .cloned()
            .collect())
    }

    async fn update_requisites(
        &self,
        external_id: &str,
        patch: RequisitesPatch,
    ) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.external_id == external_id)
            .ok_or_else(|| ClientError::NotFound("User not found".to_string()))?;

        if let Some(wallet) = patch.wallet_address {
            user.wallet_address = Some(wallet);
        }
        if let Some(number) = patch.card_number {
            user.card_number = Some(number);
        }
        if let Some(bank) = patch.card_bank {
            user.card_bank = Some(bank);
        }
        if let Some(currency) = patch.card_currency {
            user.card_currency = Some(currency);
        }
        if let Some(handle) = patch.platform_handle {
            user.platform_handle = Some(handle);
        }
        Ok(())
    }

    async fn list_notifications(&self, external_id: &str) -> ClientResult<Vec<Notification>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.list_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.recipient_external_id == external_id)
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, id: i64) -> ClientResult<()> {
        if self.fail_acks.load(Ordering::SeqCst) {
            return Err(ClientError::Network("injected ack failure".to_string()));
        }
        let mut state = self.state.lock().await;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ClientError::NotFound("Notification not found".to_string()))?;
        notification.read = true;
        state.acked.push(id);
        Ok(())
    }

    async fn create_order(&self, request: CreateOrderRequest) -> ClientResult<Order> {
        let mut state = self.state.lock().await;
        let seller_id = state
            .user_by_external(&request.seller_external_id)
            .map(|u| u.id)
            .ok_or_else(|| ClientError::NotFound("Seller not found".to_string()))?;

        let id = state.orders.len() as i64 + 1;
        let order = Order {
            id,
            code: format!("GM{:06}", id),
            order_type: request.order_type,
            payment_method: request.payment_method,
            amount: request.amount,
            currency: request.currency,
            description: request.description,
            seller_id,
            buyer_id: None,
            seller_requisites: request.seller_requisites,
            status: OrderStatus::Active,
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn get_order_by_code(&self, code: &str) -> ClientResult<Order> {
        self.state
            .lock()
            .await
            .orders
            .iter()
            .find(|o| o.code == code)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Order not found".to_string()))
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
        external_id: &str,
    ) -> ClientResult<Order> {
        let mut state = self.state.lock().await;
        let (actor_id, actor_is_admin) = state
            .user_by_external(external_id)
            .map(|u| (u.id, u.is_admin))
            .ok_or_else(|| ClientError::NotFound("User not found".to_string()))?;

        let order = state
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Order not found".to_string()))?;

        let (seller_external, updated) = {
            let seller_external = state
                .users
                .iter()
                .find(|u| u.id == order.seller_id)
                .map(|u| u.external_id.clone())
                .ok_or_else(|| ClientError::NotFound("Seller not found".to_string()))?;

            match status {
                OrderStatus::Paid => {
                    let is_buyer = order.buyer_id == Some(actor_id);
                    if order.status != OrderStatus::Active
                        || order.buyer_id.is_none()
                        || (!is_buyer && !actor_is_admin)
                    {
                        return Err(ClientError::Precondition(
                            "Status update rejected".to_string(),
                        ));
                    }
                }
                OrderStatus::Completed => {
                    if order.status != OrderStatus::Paid || order.buyer_id != Some(actor_id) {
                        return Err(ClientError::Precondition(
                            "Status update rejected".to_string(),
                        ));
                    }
                }
                OrderStatus::Active => {
                    return Err(ClientError::Precondition(
                        "Status update rejected".to_string(),
                    ));
                }
            }

            let stored = state
                .orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .expect("order disappeared");
            stored.status = status;
            (seller_external, stored.clone())
        };

        match status {
            OrderStatus::Paid => {
                state.notify(
                    &seller_external,
                    NotificationKind::PaymentConfirmed,
                    format!("Payment confirmed for order #{}", updated.code),
                );
            }
            OrderStatus::Completed => {
                if let Some(seller) = state
                    .users
                    .iter_mut()
                    .find(|u| u.id == updated.seller_id)
                {
                    seller.completed_deals += 1;
                    *seller.volumes.entry(updated.currency).or_insert(0.0) += updated.amount;
                }
                state.notify(
                    &seller_external,
                    NotificationKind::OrderCompleted,
                    format!("Order #{} completed", updated.code),
                );
            }
            OrderStatus::Active => unreachable!(),
        }

        Ok(updated)
    }

    async fn join_order(&self, order_id: i64, external_id: &str) -> ClientResult<()> {
        let mut state = self.state.lock().await;
        let buyer_id = state
            .user_by_external(external_id)
            .map(|u| u.id)
            .ok_or_else(|| ClientError::NotFound("User not found".to_string()))?;

        let order = state
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Order not found".to_string()))?;

        if order.status != OrderStatus::Active
            || order.buyer_id.is_some()
            || order.seller_id == buyer_id
        {
            return Err(ClientError::Precondition("Join rejected".to_string()));
        }

        let seller_external = state
            .users
            .iter()
            .find(|u| u.id == order.seller_id)
            .map(|u| u.external_id.clone())
            .ok_or_else(|| ClientError::NotFound("Seller not found".to_string()))?;

        state
            .orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .expect("order disappeared")
            .buyer_id = Some(buyer_id);

        state.notify(
            &seller_external,
            NotificationKind::BuyerJoined,
            format!("A buyer joined order #{}", order.code),
        );
        Ok(())
    }
}

/// One wired-up client stack against a shared fake server
pub struct TestClient {
    pub api: Arc<dyn MarketApi>,
    pub session: Arc<Session>,
    pub identity: Arc<IdentityService>,
    pub orders: Arc<OrderService>,
    pub reconciler: Arc<NotificationReconciler>,
}

fn test_config(tag: &str) -> Config {
    Config {
        api_base_url: "http://fake.invalid/api".to_string(),
        data_dir: std::env::temp_dir().join(format!(
            "giftmarket-test-{}-{}",
            tag,
            uuid::Uuid::new_v4().simple()
        )),
        display_name: tag.to_string(),
        poll_interval_secs: 1,
        rate_walk_interval_secs: 1,
        log_level: "info".to_string(),
    }
}

impl TestClient {
    /// Wire a client stack without resolving an identity (degraded session)
    pub fn degraded(server: &Arc<FakeServer>, tag: &str) -> Self {
        let api: Arc<dyn MarketApi> = server.clone();
        let session = Arc::new(Session::new());
        let identity = Arc::new(IdentityService::new(
            api.clone(),
            session.clone(),
            &test_config(tag),
        ));
        let orders = Arc::new(OrderService::new(api.clone(), session.clone()));
        let reconciler = Arc::new(NotificationReconciler::new(
            api.clone(),
            session.clone(),
            orders.clone(),
            identity.clone(),
        ));
        Self {
            api,
            session,
            identity,
            orders,
            reconciler,
        }
    }

    /// Wire a client stack and resolve its identity
    pub async fn connect(server: &Arc<FakeServer>, tag: &str) -> Self {
        let client = Self::degraded(server, tag);
        client
            .identity
            .resolve()
            .await
            .expect("identity resolution against the fake server");
        client
    }

    pub async fn current_identity(&self) -> Identity {
        self.session.identity().await.expect("identity resolved")
    }

    pub async fn external_id(&self) -> String {
        self.session.external_id().await.expect("identity resolved")
    }

    pub fn resolver(&self) -> DeepLinkResolver {
        DeepLinkResolver::new(self.api.clone(), self.session.clone(), self.orders.clone())
    }
}
