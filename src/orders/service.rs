//! Order service - lifecycle transitions and creation against the API
//!
//! Transition methods take the order snapshot the caller is acting on (the
//! same one the rendered action set was derived from). Client-side
//! precondition checks reject obviously bad actions before any network call,
//! but the server re-checks everything and stays authoritative. Every
//! mutating call refreshes the order cache afterwards; the cache has no other
//! invalidation path.

use std::sync::Arc;

use crate::api::MarketApi;
use crate::error::{ClientError, ClientResult, Notice};
use crate::identity::Identity;
use crate::orders::lifecycle;
use crate::orders::{Order, OrderStatus};
use crate::state::Session;

pub struct OrderService {
    api: Arc<dyn MarketApi>,
    session: Arc<Session>,
}

impl OrderService {
    pub fn new(api: Arc<dyn MarketApi>, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    async fn require_identity(&self) -> ClientResult<Identity> {
        self.session
            .identity()
            .await
            .ok_or_else(|| ClientError::Precondition("Identity not resolved".to_string()))
    }

    /// Refresh the order cache for the current identity. A degraded session
    /// (no identity) is a quiet no-op so the ambient poll can keep ticking.
    pub async fn refresh(&self) -> ClientResult<usize> {
        match self.session.external_id().await {
            Some(external_id) => {
                self.session
                    .orders
                    .refresh(self.api.as_ref(), &external_id)
                    .await
            }
            None => Ok(0),
        }
    }

    /// Submit the wizard draft as a single atomic create call
    pub async fn create_from_draft(&self) -> ClientResult<Order> {
        let identity = self.require_identity().await?;

        let request = {
            let wizard = self.session.wizard.lock().await;
            wizard.build(&identity)?
        };
        request.validate().map_err(ClientError::Validation)?;

        let order = self.api.create_order(request).await?;
        self.session.wizard.lock().await.reset();
        self.refresh().await?;

        self.session
            .notices
            .push(Notice::success(
                "Order created",
                format!("Share the link for order #{}", order.code),
            ))
            .await;
        Ok(order)
    }

    /// Buyer (or admin override) declares the payment sent: active → paid
    pub async fn confirm_payment(&self, order: &Order) -> ClientResult<Order> {
        let identity = self.require_identity().await?;
        lifecycle::check_transition(order, OrderStatus::Paid, identity.id, identity.is_admin)?;

        let updated = self
            .api
            .update_order_status(order.id, OrderStatus::Paid, &identity.external_id)
            .await?;
        self.refresh().await?;

        self.session
            .notices
            .push(Notice::success(
                "Payment confirmed",
                "The seller has been notified",
            ))
            .await;
        Ok(updated)
    }

    /// Seller acknowledges handing the asset to escrow. Deliberately local:
    /// the server defines no transition for this step, so no status call is
    /// made and the order stays paid.
    pub async fn confirm_transfer(&self, order: &Order) -> ClientResult<()> {
        let identity = self.require_identity().await?;

        if order.seller_id != identity.id {
            return Err(ClientError::Precondition(
                "Only the seller may confirm the transfer".to_string(),
            ));
        }
        if order.status != OrderStatus::Paid {
            return Err(ClientError::Precondition(
                "The order is not awaiting transfer".to_string(),
            ));
        }

        self.session
            .notices
            .push(Notice::success(
                "Transfer confirmed",
                "The buyer has been notified to verify receipt",
            ))
            .await;
        Ok(())
    }

    /// Buyer confirms receipt of the asset: paid → completed
    pub async fn confirm_receipt(&self, order: &Order) -> ClientResult<Order> {
        let identity = self.require_identity().await?;
        lifecycle::check_transition(order, OrderStatus::Completed, identity.id, identity.is_admin)?;

        let updated = self
            .api
            .update_order_status(order.id, OrderStatus::Completed, &identity.external_id)
            .await?;
        self.refresh().await?;

        self.session
            .notices
            .push(Notice::success(
                "Deal completed",
                format!("Order #{} is done, thank you", updated.code),
            ))
            .await;
        Ok(updated)
    }

    /// Attach the current identity to an unjoined active order as buyer
    pub async fn join(&self, order: &Order) -> ClientResult<()> {
        let identity = self.require_identity().await?;
        lifecycle::check_join(order, identity.id)?;

        self.api.join_order(order.id, &identity.external_id).await?;
        self.refresh().await?;

        self.session
            .notices
            .push(Notice::success(
                "Joined",
                "You are now the buyer on this order",
            ))
            .await;
        Ok(())
    }
}
