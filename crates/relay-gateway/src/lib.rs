//! Relay Gateway
//!
//! The host-platform entry point for the relay invocation bridge. Inbound
//! events arrive on `POST /v1/invoke` and are handed to the bridge; the
//! response envelope (or the failed stage's error) flows back to the caller.

pub mod api;

pub use api::{create_router, AppState};
