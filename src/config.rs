// Runtime configuration from environment variables

use std::env;
use std::path::PathBuf;

/// Which backing the server builds its catalog from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogBackend {
    /// Build leniently from the JSON source files at startup.
    Json,
    /// Load from the seeded SQLite store.
    Sqlite,
}

/// Settings for both binaries, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the per-company JSON source files.
    pub data_dir: PathBuf,
    /// SQLite database path.
    pub database_path: PathBuf,
    /// Server bind address.
    pub bind_addr: String,
    pub backend: CatalogBackend,
}

impl Config {
    pub fn from_env() -> Self {
        let backend = match env::var("BOTSU_BACKEND").as_deref() {
            Ok("sqlite") => CatalogBackend::Sqlite,
            _ => CatalogBackend::Json,
        };

        Config {
            data_dir: env::var("BOTSU_DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            database_path: env::var("BOTSU_DB")
                .unwrap_or_else(|_| "botsu.db".to_string())
                .into(),
            bind_addr: env::var("BOTSU_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            backend,
        }
    }
}
