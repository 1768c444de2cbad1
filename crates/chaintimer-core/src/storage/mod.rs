mod config;
mod store;

pub use config::Config;
pub use store::{Cursor, Store, HIGH_WATER_KEY, STORE_VERSION, VERSION_KEY};

use std::path::PathBuf;

/// Returns `~/.config/chaintimer[-dev]/` based on CHAINTIMER_ENV.
///
/// Set CHAINTIMER_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CHAINTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("chaintimer-dev")
    } else {
        base_dir.join("chaintimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
