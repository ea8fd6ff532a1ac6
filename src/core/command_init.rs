//! Centralized store initialization for CLI commands.
//!
//! Every subcommand needs the same [`SketchStore`]: configuration directory
//! resolved, `config.json` read, the toolchain and sketchbook overrides from the
//! command line applied. [`StoreInit`] does that once.
//!
//! # Resolution order
//! 1. **Configuration directory**: `--config-dir`, then `SKETCH_STORE_CONFIG_DIR`,
//!    then the per-user config directory
//! 2. **Toolchain binary**: `--cli`, then `cliPath` in `config.json`, then `arduino-cli`
//! 3. **Sketchbook**: `--sketchbook`, then `sketchbookDir` in `config.json`, re-read
//!    on every store operation

use crate::core::{
    config::{FileConfig, StoreConfig},
    dirs::get_config_directory,
    error::Result,
    notify::LogNotifier,
    store::SketchStore,
    toolchain::ArduinoCli,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Store related options shared by all commands
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub config_dir: Option<PathBuf>,
    pub sketchbook: Option<PathBuf>,
    pub cli: Option<PathBuf>,
    pub json: bool,
}

pub struct StoreInit;

impl StoreInit {
    pub fn config_dir(options: &StoreOptions) -> Result<PathBuf> {
        match &options.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_config_directory(),
        }
    }

    pub fn initialize(options: &StoreOptions) -> Result<SketchStore> {
        let config_dir = Self::config_dir(options)?;
        log::debug!("Using configuration directory: {}", config_dir.display());

        let config = StoreConfig::load(&config_dir)?;
        let cli_path = options
            .cli
            .clone()
            .or(config.cli_path)
            .unwrap_or_else(|| PathBuf::from(ArduinoCli::DEFAULT_BINARY));
        log::debug!("Using toolchain binary: {}", cli_path.display());

        let sketchbook = FileConfig::new(&config_dir).with_sketchbook_override(options.sketchbook.clone());

        Ok(SketchStore::new(
            Arc::new(ArduinoCli::new(cli_path)),
            Arc::new(sketchbook),
            Arc::new(LogNotifier),
            config_dir,
        ))
    }
}
