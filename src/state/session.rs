//! Application-state container for one client session
//!
//! Everything mutable the client holds lives here and is shared via `Arc`:
//! the resolved identity, the order cache, the wizard draft, the notification
//! cursor, the pending deep-link code, the display rate table and the notice
//! log. Created at session start, dropped at session end; nothing except the
//! external id file survives a restart.

use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::{Mutex, RwLock};

use crate::error::NoticeLog;
use crate::identity::{Identity, RequisitesPatch};
use crate::orders::{OrderRepository, OrderWizard};
use crate::rates::RateTable;

#[derive(Default)]
pub struct Session {
    identity: RwLock<Option<Identity>>,
    pub orders: OrderRepository,
    pub rates: RateTable,
    pub notices: NoticeLog,
    pub wizard: Mutex<OrderWizard>,
    pending_code: Mutex<Option<String>>,
    /// Highest notification id already dispatched this session
    notification_cursor: AtomicI64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.identity.read().await.clone()
    }

    /// Replace local identity state wholesale with the server's response
    pub async fn set_identity(&self, identity: Identity) {
        *self.identity.write().await = Some(identity);
    }

    pub async fn external_id(&self) -> Option<String> {
        self.identity
            .read()
            .await
            .as_ref()
            .map(|identity| identity.external_id.clone())
    }

    /// Merge saved requisite fields into the local identity (not replace)
    pub async fn merge_requisites(&self, patch: &RequisitesPatch) {
        if let Some(identity) = self.identity.write().await.as_mut() {
            identity.requisites.merge(patch);
        }
    }

    pub fn notification_cursor(&self) -> i64 {
        self.notification_cursor.load(Ordering::SeqCst)
    }

    /// Advance the cursor; never moves backwards
    pub fn advance_notification_cursor(&self, id: i64) {
        self.notification_cursor.fetch_max(id, Ordering::SeqCst);
    }

    pub async fn set_pending_code(&self, code: impl Into<String>) {
        *self.pending_code.lock().await = Some(code.into());
    }

    pub async fn pending_code(&self) -> Option<String> {
        self.pending_code.lock().await.clone()
    }

    /// Drop the shareable reference so a re-visit does not re-trigger the flow
    pub async fn clear_pending_code(&self) {
        *self.pending_code.lock().await = None;
    }
}
