//! Relay services: token lifecycle, namespaced storage and expiry.

pub mod reaper;
pub mod registry;
pub mod relay;
pub mod store;

pub use reaper::{ExpiryReaper, ReapOutcome, ReaperHandle, SweepResult};
pub use registry::TokenRegistry;
pub use relay::RelayService;
pub use store::NamespacedStore;
