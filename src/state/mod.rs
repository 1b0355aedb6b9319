//! Shared session state

mod session;

pub use session::Session;
