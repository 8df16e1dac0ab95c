pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use r#trait::KeyValueBackend;
pub use memory::MemoryBackend;

#[cfg(test)]
pub mod faulty;
#[cfg(test)]
pub use faulty::FaultyBackend;
