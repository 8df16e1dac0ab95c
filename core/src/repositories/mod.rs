pub mod backend;

pub use backend::{KeyValueBackend, MemoryBackend};

#[cfg(test)]
pub use backend::FaultyBackend;
