//! Shared configuration types for the relay server
//!
//! Every crate in the workspace reads its settings through the types defined here.

pub mod config;

pub use config::{
    AppConfig, CacheConfig, Environment, LogFormat, LoggingConfig, ReaperConfig, ServerConfig,
};
