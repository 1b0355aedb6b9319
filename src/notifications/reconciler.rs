//! Notification reconciliation loop
//!
//! A recurring poll converts server-side event records into local state
//! updates exactly once. The highest-processed-id cursor is the idempotence
//! boundary: acknowledgement (mark-read) calls are fire-and-forget, and when
//! one fails the same record will come back `read=false` on the next poll but
//! the cursor filter already keeps it from being dispatched again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::api::MarketApi;
use crate::error::{ClientResult, Notice};
use crate::identity::IdentityService;
use crate::notifications::{Notification, NotificationKind};
use crate::orders::OrderService;
use crate::state::Session;

pub struct NotificationReconciler {
    api: Arc<dyn MarketApi>,
    session: Arc<Session>,
    orders: Arc<OrderService>,
    identity: Arc<IdentityService>,
    in_flight: AtomicBool,
}

impl NotificationReconciler {
    pub fn new(
        api: Arc<dyn MarketApi>,
        session: Arc<Session>,
        orders: Arc<OrderService>,
        identity: Arc<IdentityService>,
    ) -> Self {
        Self {
            api,
            session,
            orders,
            identity,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Poll forever on a fixed interval. Poll errors are logged and the loop
    /// simply tries again next tick.
    pub async fn run(self: Arc<Self>, interval: Duration) {
        tracing::info!(
            interval_secs = interval.as_secs(),
            "Starting notification reconciliation loop"
        );
        loop {
            if let Err(err) = self.poll_once().await {
                tracing::error!(error = %err, "Notification poll failed");
            }
            tokio::time::sleep(interval).await;
        }
    }

    /// One poll tick. If the previous tick is still in flight (a slow request
    /// outlasting the interval), this tick is skipped entirely.
    pub async fn poll_once(&self) -> ClientResult<()> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Previous poll still in flight, skipping tick");
            return Ok(());
        }

        let result = self.reconcile().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn reconcile(&self) -> ClientResult<()> {
        // Identity not resolved yet: nothing to poll for.
        let Some(external_id) = self.session.external_id().await else {
            return Ok(());
        };

        let notifications = self.api.list_notifications(&external_id).await?;
        let cursor = self.session.notification_cursor();

        let mut pending: Vec<Notification> = notifications
            .into_iter()
            .filter(|n| !n.read && n.id > cursor)
            .collect();
        if pending.is_empty() {
            return Ok(());
        }
        pending.sort_by_key(|n| n.id);

        tracing::debug!(count = pending.len(), cursor, "Dispatching new notifications");

        for notification in pending {
            self.dispatch(&notification).await;
            self.session.advance_notification_cursor(notification.id);

            // Fire-and-forget acknowledgement. Failure is logged, never
            // retried, and never blocks later notifications: the cursor has
            // already advanced.
            let api = self.api.clone();
            let id = notification.id;
            tokio::spawn(async move {
                if let Err(err) = api.mark_notification_read(id).await {
                    tracing::warn!(notification_id = id, error = %err, "Failed to acknowledge notification");
                }
            });
        }

        Ok(())
    }

    /// Apply one notification to local state. Dispatch failures are logged
    /// and never abort the batch.
    async fn dispatch(&self, notification: &Notification) {
        let notice = match notification.kind {
            NotificationKind::BuyerJoined => Notice::info("New buyer", &notification.message),
            NotificationKind::PaymentConfirmed => {
                Notice::success("Payment received", &notification.message)
            }
            NotificationKind::OrderCompleted => {
                Notice::success("Deal completed", &notification.message)
            }
        };
        self.session.notices.push(notice).await;

        if let Err(err) = self.orders.refresh().await {
            tracing::error!(notification_id = notification.id, error = %err, "Order refresh failed");
        }

        // Completed deals change seller stats; re-resolve the identity to
        // pick up the server's authoritative aggregates.
        if notification.kind == NotificationKind::OrderCompleted {
            if let Err(err) = self.identity.resolve().await {
                tracing::error!(notification_id = notification.id, error = %err, "Identity re-resolution failed");
            }
        }
    }
}
