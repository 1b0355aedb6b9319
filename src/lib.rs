//! GiftMarket client library
//!
//! Client side of an escrow-mediated peer-to-peer marketplace for NFT-like
//! digital assets. The remote API server and its database are external
//! collaborators; this crate owns identity resolution, the order lifecycle
//! engine, the notification reconciliation loop and the surrounding session
//! state.

pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod notifications;
pub mod orders;
pub mod rates;
pub mod state;
