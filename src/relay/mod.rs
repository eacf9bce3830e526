//! Request relay to the backend service.
//!
//! Every `/api` handler that does not talk to a third party reconstructs the
//! inbound request against the configured backend origin and hands the
//! backend's answer back to the caller.

mod client;
mod request;
mod response;
mod target;

pub use client::*;
pub use request::*;
pub use response::*;
pub use target::*;
