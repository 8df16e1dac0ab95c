//! Relay service module
//!
//! Orchestrates the registry and the namespaced store for register/set/get
//! requests. This is the only layer the transport talks to.

mod service;


pub use service::RelayService;
