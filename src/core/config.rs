use crate::core::error::{Result, SketchStoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Settings key holding a user supplied blueprint `.ino` path
pub const INO_BLUEPRINT_SETTING: &str = "arduino.sketch.inoBlueprint";

/// Source of the sketchbook location. Read on every call, never cached.
pub trait SketchbookConfig: Send + Sync {
    fn sketchbook_dir(&self) -> Result<Option<PathBuf>>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sketchbook_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cli_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Load `config.json` from `config_dir`. A missing file is an empty config.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join(CONFIG_FILE);

        let content = match std::fs::read_to_string(&config_file) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(SketchStoreError::io_at(&config_file, e)),
        };

        serde_json::from_str(&content)
            .map_err(|e| SketchStoreError::config_parse_failed(&config_file, e))
    }

    pub fn save(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)?;

        let config_file = config_dir.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_file, content)
            .map_err(|e| SketchStoreError::io_at(&config_file, e))?;

        Ok(())
    }
}

/// Reads the sketchbook directory from `config.json`, with an optional fixed override
pub struct FileConfig {
    config_dir: PathBuf,
    sketchbook_override: Option<PathBuf>,
}

impl FileConfig {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            sketchbook_override: None,
        }
    }

    pub fn with_sketchbook_override(mut self, sketchbook_dir: Option<PathBuf>) -> Self {
        self.sketchbook_override = sketchbook_dir;
        self
    }
}

impl SketchbookConfig for FileConfig {
    fn sketchbook_dir(&self) -> Result<Option<PathBuf>> {
        if let Some(dir) = &self.sketchbook_override {
            return Ok(Some(dir.clone()));
        }
        Ok(StoreConfig::load(&self.config_dir)?.sketchbook_dir)
    }
}

/// A fixed sketchbook location
impl SketchbookConfig for Option<PathBuf> {
    fn sketchbook_dir(&self) -> Result<Option<PathBuf>> {
        Ok(self.clone())
    }
}

/// Read the blueprint path from `settings.json`.
///
/// A missing or unparsable settings file, or a missing or non-string key, all mean
/// there is no custom blueprint.
pub fn read_ino_blueprint_setting(config_dir: &Path) -> Result<Option<PathBuf>> {
    let settings_file = config_dir.join(SETTINGS_FILE);

    let raw = match std::fs::read_to_string(&settings_file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SketchStoreError::io_at(&settings_file, e)),
    };

    let settings: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Ignoring unparsable settings file {}: {e}", settings_file.display());
            return Ok(None);
        }
    };

    Ok(settings
        .get(INO_BLUEPRINT_SETTING)
        .and_then(|value| value.as_str())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from))
}
