//! Namespaced store module

mod service;


pub use service::NamespacedStore;
