use crate::core::error::SketchStoreError;
use std::path::PathBuf;

/// Environment variable that overrides the per-user configuration directory
pub const CONFIG_DIR_ENV: &str = "SKETCH_STORE_CONFIG_DIR";

const APP_DIR_NAME: &str = "arduino-ide";

pub fn get_config_directory() -> Result<PathBuf, SketchStoreError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config"))),
        "macos" => dirs::home_dir().map(|home| home.join("Library/Application Support")),
        _ => dirs::config_dir(),
    };

    base.map(|base| base.join(APP_DIR_NAME))
        .ok_or(SketchStoreError::ConfigDirectoryNotFound)
}

/// Fallback parent for new sketch name collision checks when no sketchbook is configured
pub fn get_home_directory() -> PathBuf {
    dirs::home_dir().unwrap_or_else(std::env::temp_dir)
}
