mod config;
pub mod database;

pub use config::{BackendConfig, BackendKind, Config, FirestoreConfig, RestConfig, TrackerConfig};
pub use database::Database;

use std::path::PathBuf;

/// Returns the data directory.
///
/// `POINTSTRACKER_DATA_DIR` wins when set; otherwise `~/.config/pointstracker/`,
/// or `~/.config/pointstracker-dev/` with `POINTSTRACKER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POINTSTRACKER_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POINTSTRACKER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pointstracker-dev")
            } else {
                base_dir.join("pointstracker")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
