//! Request handler helpers shared by the routes

pub mod error;
pub mod params;

pub use error::{error_response, status_for};
pub use params::relay_params;
