//! Order lifecycle engine
//!
//! The status machine is `Active → Paid → Completed`, strictly forward. This
//! module holds the pure parts: which role a viewer plays on an order, which
//! actions that role may take in the order's current status, and the
//! client-side precondition checks for each transition. The server re-checks
//! everything; these checks exist to reject bad actions before any network
//! call and to derive the rendered action set.

use crate::error::{ClientError, ClientResult};
use crate::orders::{Order, OrderStatus};

/// Role the viewing identity plays on a given order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRole {
    Seller,
    Buyer,
    Observer,
}

pub fn viewer_role(order: &Order, viewer_id: i64) -> ViewerRole {
    if order.seller_id == viewer_id {
        ViewerRole::Seller
    } else if order.buyer_id == Some(viewer_id) {
        ViewerRole::Buyer
    } else {
        ViewerRole::Observer
    }
}

/// Actions renderable against an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Seller shares the order link while waiting for a buyer
    CopyLink,
    /// Seller acknowledges handing the asset to escrow (local-only, see below)
    ConfirmTransfer,
    /// Buyer declares the payment sent
    ConfirmPayment,
    /// Buyer confirms receipt of the asset, completing the deal
    ConfirmReceipt,
    /// An outside identity joins an unjoined active order as buyer
    Join,
    /// Admin override: mark a joined active order as paid
    AdminMarkPaid,
}

/// The visible action set is a pure function of (status, role, is_admin)
pub fn available_actions(order: &Order, viewer_id: i64, is_admin: bool) -> Vec<OrderAction> {
    let mut actions = Vec::new();

    match viewer_role(order, viewer_id) {
        ViewerRole::Seller => match order.status {
            OrderStatus::Active => actions.push(OrderAction::CopyLink),
            OrderStatus::Paid => actions.push(OrderAction::ConfirmTransfer),
            OrderStatus::Completed => {}
        },
        ViewerRole::Buyer => match order.status {
            OrderStatus::Active => actions.push(OrderAction::ConfirmPayment),
            OrderStatus::Paid => actions.push(OrderAction::ConfirmReceipt),
            OrderStatus::Completed => {}
        },
        ViewerRole::Observer => {
            if order.status == OrderStatus::Active && order.buyer_id.is_none() {
                actions.push(OrderAction::Join);
            }
        }
    }

    // Admin override is independent of the viewer's role on the order.
    if is_admin && order.status == OrderStatus::Active && order.buyer_id.is_some() {
        actions.push(OrderAction::AdminMarkPaid);
    }

    actions
}

/// Render model for one order as seen by one viewer
///
/// Seller requisites are the snapshot frozen at creation time; they are
/// exposed only to the assigned buyer while payment is due, never to anyone
/// else. The shareable link is exposed only to the seller.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub code: String,
    pub type_label: &'static str,
    pub status: OrderStatus,
    pub amount: f64,
    pub currency_code: &'static str,
    pub description: String,
    pub seller_requisites: Option<String>,
    pub share_link: Option<String>,
    pub actions: Vec<OrderAction>,
}

pub fn order_view(order: &Order, viewer_id: i64, is_admin: bool) -> OrderView {
    let role = viewer_role(order, viewer_id);
    let seller_requisites = (role == ViewerRole::Buyer && order.status == OrderStatus::Active)
        .then(|| order.seller_requisites.clone());
    let share_link = (role == ViewerRole::Seller).then(|| order.share_link());

    OrderView {
        code: order.code.clone(),
        type_label: order.order_type.label(),
        status: order.status,
        amount: order.amount,
        currency_code: order.currency.code(),
        description: order.description.clone(),
        seller_requisites,
        share_link,
        actions: available_actions(order, viewer_id, is_admin),
    }
}

/// Check whether `actor` may move `order` to `target` before calling the
/// status endpoint
pub fn check_transition(
    order: &Order,
    target: OrderStatus,
    actor_id: i64,
    is_admin: bool,
) -> ClientResult<()> {
    if !order.status.can_advance_to(target) {
        return Err(ClientError::Precondition(format!(
            "Order #{} cannot move from {:?} to {:?}",
            order.code, order.status, target
        )));
    }

    match target {
        OrderStatus::Paid => {
            let is_buyer = order.buyer_id == Some(actor_id);
            let admin_override = is_admin && order.buyer_id.is_some();
            if !is_buyer && !admin_override {
                return Err(ClientError::Precondition(
                    "Only the assigned buyer (or an admin) may confirm payment".to_string(),
                ));
            }
        }
        OrderStatus::Completed => {
            if order.buyer_id != Some(actor_id) {
                return Err(ClientError::Precondition(
                    "Only the assigned buyer may confirm receipt".to_string(),
                ));
            }
        }
        OrderStatus::Active => {
            return Err(ClientError::Precondition(
                "Orders never return to active".to_string(),
            ));
        }
    }

    Ok(())
}

/// Check whether `actor` may join `order` as buyer
pub fn check_join(order: &Order, actor_id: i64) -> ClientResult<()> {
    if order.seller_id == actor_id {
        return Err(ClientError::Precondition(
            "You cannot join your own order".to_string(),
        ));
    }
    if order.status != OrderStatus::Active {
        return Err(ClientError::Precondition(
            "This order is no longer active".to_string(),
        ));
    }
    if order.buyer_id.is_some() {
        return Err(ClientError::Precondition(
            "This order already has a buyer".to_string(),
        ));
    }
    Ok(())
}
