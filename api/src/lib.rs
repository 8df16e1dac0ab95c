//! # Relay API
//!
//! actix-web surface of the relay: token registration, namespaced set/get and
//! a backend health probe. Exposed as a library so integration tests can build
//! the same application the binary serves.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
