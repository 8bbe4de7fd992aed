//! Application configuration
//!
//! Everything comes from the environment (optionally seeded from a
//! `.env` file loaded in `main`). `KIOSCO_API_URL` points at the
//! backend; `KIOSCO_DATA_DIR` is where durable state lives.

use kiosco_client::ClientConfig;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ClientConfig,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("KIOSCO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());
        Self {
            api: ClientConfig::from_env(),
            data_dir,
        }
    }
}

fn default_data_dir() -> PathBuf {
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".kiosco"))
        .unwrap_or_else(|_| PathBuf::from(".kiosco"))
}
