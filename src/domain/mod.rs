//! Domain types for the compliance gateway.
//!
//! The backend owns every entity. These are the few shapes the gateway
//! itself reads or produces.

mod blog;
mod contact;
mod payment;

pub use blog::*;
pub use contact::*;
pub use payment::*;
