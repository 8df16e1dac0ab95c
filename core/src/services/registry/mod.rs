//! Token registry module

mod service;


pub use service::TokenRegistry;
