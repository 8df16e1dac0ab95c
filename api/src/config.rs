//! Configuration loading for the API binary

use std::path::PathBuf;

use relay_shared::config::{AppConfig, Environment};

/// Load `.env` files, then build the configuration from the environment
///
/// `.env` is read first so it can select the environment; the matching
/// `.env.<environment>` file then fills in anything still unset. Variables
/// already present in the process environment are never overwritten.
///
/// Returns the configuration and the files that were loaded.
pub fn load() -> (AppConfig, Vec<PathBuf>) {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    let environment = Environment::from_env();
    if let Ok(path) = dotenvy::from_filename(environment.env_file()) {
        loaded.push(path);
    }

    (AppConfig::from_env(), loaded)
}
