//! Notifications domain module

mod model;
mod reconciler;

pub use model::{Notification, NotificationKind};
pub use reconciler::NotificationReconciler;
