//! Route handlers
//!
//! - `index` - welcome text
//! - `register` - token registration
//! - `set` / `get` - namespaced writes and reads
//! - `health` - backend reachability probe

pub mod get;
pub mod health;
pub mod index;
pub mod register;
pub mod set;
