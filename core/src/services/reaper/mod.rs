//! Expiry reaper module
//!
//! Periodically removes tokens that have gone unused beyond the configured
//! threshold, together with all of their namespaced data.

mod sweep;


pub use sweep::{ExpiryReaper, ReapOutcome, ReaperHandle, SweepResult};
