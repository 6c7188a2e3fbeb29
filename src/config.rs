use std::{env, path::PathBuf};

use tracing::{info, warn};

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Upstream API base, without trailing slash.
    pub api_base: String,
    /// Excel export service base, without trailing slash.
    pub excel_base: String,
    pub session_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let api_base = trim_base(require("API_URL"));
        let excel_base = match env::var("EXCEL_URL") {
            Ok(value) => trim_base(value),
            Err(_) => {
                info!("EXCEL_URL not set, using API_URL for exports");
                api_base.clone()
            }
        };

        Self {
            port: try_load("PORT", "8080"),
            api_base,
            excel_base,
            session_path: resolve_session_path(),
        }
    }
}

fn resolve_session_path() -> PathBuf {
    match env::var("SESSION_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("data/session.json"),
    }
}

fn require(key: &str) -> String {
    env::var(key)
        .map_err(|_| {
            warn!("Environment variable {key} not found");
        })
        .expect("Environment misconfigured!")
}

fn try_load<T: std::str::FromStr>(key: &str, default: &str) -> T
where
    T::Err: std::fmt::Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn trim_base(value: String) -> String {
    value.trim_end_matches('/').to_string()
}
