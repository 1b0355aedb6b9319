//! Orders domain module
//!
//! Contains models, the lifecycle engine, the client-side cache, the order
//! service, the entry wizard and the deep-link resolver.

pub mod lifecycle;

mod deeplink;
mod model;
mod repository;
mod service;
mod wizard;

pub use deeplink::{DeepLinkOutcome, DeepLinkResolver, JoinOffer};
pub use lifecycle::{available_actions, order_view, OrderAction, OrderView, ViewerRole};
pub use model::*;
pub use repository::OrderRepository;
pub use service::OrderService;
pub use wizard::{OrderWizard, WizardStep};
