//! Identity domain module
//!
//! Durable pseudo-identity resolution, per-channel requisites and
//! server-owned stats.

mod model;
mod service;

pub use model::*;
pub use service::IdentityService;
