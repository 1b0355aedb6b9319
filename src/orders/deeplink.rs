//! Deep-link resolution for shareable order codes
//!
//! An incoming code resolves to either "this is my order" or a join offer.
//! Every rejection surfaces a notice; the stored pending code is cleared only
//! after a successful join so a refresh cannot re-trigger the flow.

use std::sync::Arc;

use crate::api::MarketApi;
use crate::error::{ClientError, ClientResult, Notice};
use crate::orders::lifecycle;
use crate::orders::{Order, OrderService};
use crate::state::Session;

/// Result of resolving an incoming order reference
#[derive(Debug)]
pub enum DeepLinkOutcome {
    /// The current identity is the seller; no self-join is offered
    OwnOrder(Order),
    /// Joinable order: terms plus the frozen seller-requisites snapshot
    JoinOffer(JoinOffer),
}

#[derive(Debug)]
pub struct JoinOffer {
    pub order: Order,
}

impl JoinOffer {
    /// Payment destination shown to the prospective buyer
    pub fn payment_requisites(&self) -> &str {
        &self.order.seller_requisites
    }
}

pub struct DeepLinkResolver {
    api: Arc<dyn MarketApi>,
    session: Arc<Session>,
    orders: Arc<OrderService>,
}

impl DeepLinkResolver {
    pub fn new(api: Arc<dyn MarketApi>, session: Arc<Session>, orders: Arc<OrderService>) -> Self {
        Self {
            api,
            session,
            orders,
        }
    }

    /// Resolve an incoming shareable order code
    pub async fn resolve(&self, code: &str) -> ClientResult<DeepLinkOutcome> {
        self.session.set_pending_code(code).await;

        let identity = self.session.identity().await.ok_or_else(|| {
            ClientError::Precondition("Identity not resolved".to_string())
        })?;

        let order = match self.api.get_order_by_code(code).await {
            Ok(order) => order,
            Err(err) => {
                self.session
                    .notices
                    .push(Notice::from_error("Order not found", &err))
                    .await;
                return Err(err);
            }
        };

        if order.seller_id == identity.id {
            self.session
                .notices
                .push(Notice::info("Heads up", "This is your own order"))
                .await;
            return Ok(DeepLinkOutcome::OwnOrder(order));
        }

        if let Err(err) = lifecycle::check_join(&order, identity.id) {
            self.session
                .notices
                .push(Notice::from_error("Cannot join order", &err))
                .await;
            return Err(err);
        }

        Ok(DeepLinkOutcome::JoinOffer(JoinOffer { order }))
    }

    /// Confirm a previously offered join, then clear the pending code so a
    /// re-visit does not re-trigger the flow
    pub async fn confirm_join(&self, offer: &JoinOffer) -> ClientResult<()> {
        self.orders.join(&offer.order).await?;
        self.session.clear_pending_code().await;
        Ok(())
    }
}
