//! Domain layer: token entities and the backend key layout.

pub mod entities;
pub mod keys;

pub use entities::*;
