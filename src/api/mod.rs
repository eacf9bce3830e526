//! HTTP API layer for the compliance gateway.
//!
//! Provides the `/api` relay endpoints, the contact and checkout endpoints,
//! and the robots/sitemap/rss feeds.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
