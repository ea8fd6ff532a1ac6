//! Persistence of the recently opened sketches.
//!
//! The record is a flat JSON object mapping sketch URIs to the epoch millisecond
//! timestamp of their last opening, stored in `recent-sketches.json`.
//!
//! # Public API
//! - [`RecentSketchesFile`]: load and save the record
//! - [`record_opened`]: upsert an entry and enforce the size bound
//! - [`MAX_RECENT_SKETCHES`]: the size bound

use crate::core::error::{Result, SketchStoreError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const RECENT_SKETCHES_FILE: &str = "recent-sketches.json";

pub const MAX_RECENT_SKETCHES: usize = 10;

/// Sketch URI → last opened timestamp in epoch milliseconds
pub type RecentSketches = BTreeMap<String, u64>;

pub struct RecentSketchesFile {
    path: PathBuf,
}

impl RecentSketchesFile {
    pub fn in_config_dir(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(RECENT_SKETCHES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing file is normal on first run and yields an empty
    /// record, as does unparsable content.
    pub fn load(&self) -> Result<RecentSketches> {
        log::debug!(">>> Loading recently opened sketches data.");

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!(
                    "<<< '{RECENT_SKETCHES_FILE}' does not exist yet. Falling back to empty data."
                );
                return Ok(RecentSketches::new());
            }
            Err(e) => return Err(SketchStoreError::io_at(&self.path, e)),
        };

        let data = match serde_json::from_str::<RecentSketches>(&raw) {
            Ok(data) => data,
            Err(e) => {
                log::error!("Could not parse recently opened sketches ({e}). Raw input was: {raw}");
                RecentSketches::new()
            }
        };

        log::debug!(
            "<<< Successfully loaded {} recently opened sketch entries.",
            data.len()
        );
        Ok(data)
    }

    pub fn save(&self, data: &RecentSketches) -> Result<()> {
        log::debug!(">>> Saving {} recently opened sketch entries.", data.len());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SketchStoreError::recent_sketches_write_failed(parent, e))?;
        }

        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)
            .map_err(|e| SketchStoreError::recent_sketches_write_failed(&self.path, e))?;

        log::debug!("<<< Successfully saved recently opened sketches data.");
        Ok(())
    }
}

/// Record `uri` as opened at `now_ms`, evicting the globally oldest entry when the
/// record grows past [`MAX_RECENT_SKETCHES`]. Returns the evicted entry.
pub fn record_opened(data: &mut RecentSketches, uri: &str, now_ms: u64) -> Option<(String, u64)> {
    data.insert(uri.to_string(), now_ms);

    if data.len() <= MAX_RECENT_SKETCHES {
        return None;
    }

    let oldest = data
        .iter()
        .min_by_key(|(_, timestamp)| **timestamp)
        .map(|(uri, _)| uri.clone())?;
    data.remove_entry(&oldest)
}

/// URIs ordered by most recently opened first
pub fn by_recency(data: &RecentSketches) -> Vec<String> {
    let mut entries: Vec<(&String, &u64)> = data.iter().collect();
    entries.sort_by(|left, right| right.1.cmp(left.1));
    entries.into_iter().map(|(uri, _)| uri.clone()).collect()
}
