//! Notification models

use serde::{Deserialize, Serialize};

/// Server-side event kinds produced by order-lifecycle transitions
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BuyerJoined,
    PaymentConfirmed,
    OrderCompleted,
}

/// A pending event record for the current identity
///
/// Ids are server-assigned and monotonically increasing; the reconciler
/// tracks the highest processed id so a redelivered record is never
/// dispatched twice.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Notification {
    pub id: i64,
    pub recipient_external_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
}
