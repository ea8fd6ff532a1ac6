//! The sketch store.
//!
//! [`SketchStore`] ties the collaborators together: a [`Toolchain`] that decides what
//! a sketch is, a [`SketchbookConfig`] that locates the sketchbook, and a
//! [`NotificationSink`] told about recent sketch changes. State files live in the
//! configuration directory passed at construction.
//!
//! # Public API
//! - [`SketchStore`]: discovery, identity resolution, lifecycle and recent sketches
//! - [`is_accessible_sketch_path`]: invalid sketch name heuristic
//! - [`DEFAULT_INO`]: built-in blueprint for new sketches
//!
//! # Concurrency
//! Every method blocks until done. Reads and writes of the recent sketches run under a
//! single mutex, one at a time in the order they were submitted. All other operations
//! may run concurrently and give no ordering guarantees among themselves.

use crate::core::{
    config::{read_ino_blueprint_setting, SketchbookConfig},
    dirs::get_home_directory,
    discovery::discover_sketches,
    error::{Result, SketchStoreError},
    file_uri,
    notify::NotificationSink,
    recent::{by_recency, record_opened, RecentSketches, RecentSketchesFile},
    sketch::{Sketch, SketchContainer, SketchRef, SketchWithDetails},
    sketch_name::{sketch_base_name, SketchNamer},
    temp::{build_folder_for, create_temp_folder, is_temp_sketch},
    toolchain::{LoadSketchResponse, Toolchain, ToolchainError},
};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::{Duration, UNIX_EPOCH};
use url::Url;
use walkdir::WalkDir;

pub const DEFAULT_INO: &str = "void setup() {
  // put your setup code here, to run once:

}

void loop() {
  // put your main code here, to run repeatedly:

}
";

const SKETCHBOOK_LABEL: &str = "Sketchbook";
const MAX_DELETE_RETRIES: u32 = 5;
const DELETE_RETRY_DELAY: Duration = Duration::from_millis(100);

pub struct SketchStore {
    toolchain: Arc<dyn Toolchain>,
    config: Arc<dyn SketchbookConfig>,
    notifier: Arc<dyn NotificationSink>,
    config_dir: PathBuf,
    temp_root: PathBuf,
    namer: Mutex<SketchNamer>,
    blueprint: OnceLock<String>,
    recent_sketches: Mutex<Option<Vec<SketchWithDetails>>>,
}

impl SketchStore {
    pub fn new(
        toolchain: Arc<dyn Toolchain>,
        config: Arc<dyn SketchbookConfig>,
        notifier: Arc<dyn NotificationSink>,
        config_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            toolchain,
            config,
            notifier,
            config_dir: config_dir.into(),
            temp_root: std::env::temp_dir(),
            namer: Mutex::new(SketchNamer::new()),
            blueprint: OnceLock::new(),
            recent_sketches: Mutex::new(None),
        }
    }

    /// Create temp workspaces and build folders below `temp_root` instead of the OS
    /// temp directory
    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = temp_root.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    // === Discovery ===

    /// List the sketches below `root`, or below the configured sketchbook.
    ///
    /// Never fails on a missing or unconfigured root; the result is then an empty
    /// container with an empty label.
    pub fn get_sketches(&self, root: Option<&Url>) -> Result<SketchContainer> {
        let (root_path, label) = match root {
            Some(uri) => {
                let path = file_uri::to_path(uri)?;
                let label = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                (path, label)
            }
            None => match self.config.sketchbook_dir() {
                Ok(Some(dir)) => (dir, SKETCHBOOK_LABEL.to_string()),
                Ok(None) => {
                    log::warn!("No sketchbook directory is configured.");
                    return Ok(SketchContainer::new(""));
                }
                Err(e) => {
                    log::warn!("Could not derive sketchbook root: {e}");
                    return Ok(SketchContainer::new(""));
                }
            },
        };

        if !root_path.is_dir() {
            log::warn!("Sketchbook root {} does not exist.", root_path.display());
            return Ok(SketchContainer::new(""));
        }

        Ok(discover_sketches(&root_path, label))
    }

    // === Identity resolution ===

    /// Load the sketch at `uri`, diagnosing misnamed main files as
    /// [`SketchStoreError::InvalidName`].
    pub fn load_sketch(&self, uri: &Url) -> Result<SketchWithDetails> {
        self.do_load_sketch(uri, true)
    }

    /// Like [`load_sketch`](Self::load_sketch), but a missing or invalid sketch is `None`
    pub fn maybe_load_sketch(&self, uri: &Url) -> Result<Option<SketchWithDetails>> {
        match self.do_load_sketch(uri, false) {
            Ok(sketch) => Ok(Some(sketch)),
            Err(e) if e.is_not_found_or_invalid_name() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn is_sketch_folder(&self, uri: &Url) -> Result<bool> {
        Ok(self.maybe_load_sketch(uri)?.is_some())
    }

    /// The closest ancestor of `uri` (itself included) that is a sketch
    pub fn get_sketch_folder(&self, uri: &Url) -> Result<Option<SketchWithDetails>> {
        let mut current = Some(file_uri::to_path(uri)?);

        while let Some(path) = current {
            let parent = path.parent().map(Path::to_path_buf);
            if parent.is_none() {
                break;
            }
            if let Some(sketch) = self.maybe_load_sketch(&file_uri::from_path(&path)?)? {
                return Ok(Some(sketch));
            }
            current = parent;
        }

        Ok(None)
    }

    pub fn is_temp(&self, sketch: &SketchRef) -> bool {
        sketch
            .path()
            .map(|path| is_temp_sketch(&self.temp_root, &path))
            .unwrap_or(false)
    }

    fn do_load_sketch(&self, uri: &Url, detect_invalid_name: bool) -> Result<SketchWithDetails> {
        let request_path = file_uri::to_path(uri)?;

        let (loaded, stat) = std::thread::scope(|scope| {
            let stat = scope.spawn(|| fs::symlink_metadata(&request_path));
            let loaded = self.toolchain.load_sketch(&request_path);
            let stat = stat
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stat of sketch path panicked")));
            (loaded, stat)
        });

        let response = match loaded {
            Ok(response) => response,
            Err(ToolchainError::NotFound(details)) => {
                return Err(self.not_found_error(uri, &request_path, details, detect_invalid_name)?)
            }
            Err(e) => return Err(e.into()),
        };

        if response.location_path != request_path {
            log::warn!(
                "The request sketch path was different than the response sketch path from the toolchain. Request: <{}>, response: <{}>.",
                request_path.display(),
                response.location_path.display()
            );
        }

        let metadata = match stat {
            Ok(metadata) => metadata,
            Err(e) => {
                log::error!(
                    "The toolchain could load the sketch from {}, but stating the folder has failed: {e}",
                    request_path.display()
                );
                return Err(SketchStoreError::io_at(&request_path, e));
            }
        };
        let mtime_ms = match metadata
            .modified()
            .and_then(|modified| modified.duration_since(UNIX_EPOCH).map_err(std::io::Error::other))
        {
            Ok(elapsed) => elapsed.as_millis() as u64,
            Err(e) => {
                log::debug!(
                    "No modification time for {}, using 0: {e}",
                    request_path.display()
                );
                0
            }
        };

        Ok(SketchWithDetails {
            sketch: sketch_from_response(response)?,
            mtime_ms,
        })
    }

    /// NotFound, or InvalidName when a misnamed sketch file sits at `request_path`.
    ///
    /// Detection costs extra filesystem access, so callers that only care about
    /// presence skip it.
    fn not_found_error(
        &self,
        uri: &Url,
        request_path: &Path,
        details: String,
        detect_invalid_name: bool,
    ) -> Result<SketchStoreError> {
        if detect_invalid_name {
            if let Some(main_file) = is_accessible_sketch_path(request_path, false)? {
                let main_file_uri = file_uri::from_path(&main_file)?;
                return Ok(SketchStoreError::invalid_name(details, main_file_uri.as_str()));
            }
        }
        Ok(SketchStoreError::not_found(details, uri.as_str()))
    }

    // === Lifecycle ===

    /// Create `sketch_<mon><day><suffix>` in a fresh temp workspace.
    ///
    /// The name is checked for collisions against the sketchbook, where the sketch is
    /// expected to be saved eventually, not against the temp workspace.
    pub fn create_new_sketch(&self) -> Result<SketchWithDetails> {
        let today = chrono::Local::now().date_naive();
        let parent = create_temp_folder(&self.temp_root)?;
        let sketchbook = self
            .config
            .sketchbook_dir()?
            .unwrap_or_else(get_home_directory);

        let sketch_name = self
            .namer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_name(today, |candidate| sketchbook.join(candidate).exists())
            .ok_or_else(|| SketchStoreError::name_exhausted(sketch_base_name(today)))?;

        let sketch_dir = parent.join(&sketch_name);
        let sketch_file = sketch_dir.join(format!("{sketch_name}.ino"));
        let ino_content = self.load_ino_content()?;
        fs::create_dir_all(&sketch_dir).map_err(|e| SketchStoreError::io_at(&sketch_dir, e))?;
        fs::write(&sketch_file, ino_content)
            .map_err(|e| SketchStoreError::io_at(&sketch_file, e))?;

        log::info!("Created new sketch {sketch_name} at {}", sketch_dir.display());
        self.do_load_sketch(&file_uri::from_path(&sketch_dir)?, false)
    }

    /// Copy the sketch at `uri` into a fresh temp workspace, keeping its name
    pub fn clone_example(&self, uri: &Url) -> Result<SketchWithDetails> {
        let sketch = self.do_load_sketch(uri, false)?;
        let parent = create_temp_folder(&self.temp_root)?;
        let destination = file_uri::from_path(&parent.join(&sketch.name))?;
        let copied = self.copy(&sketch, &destination)?;
        self.do_load_sketch(&copied, false)
    }

    /// Copy `sketch` to `destination`, renaming the main file after the new folder.
    ///
    /// The copy goes through a temp staging folder first, so a destination nested
    /// inside the source never copies into itself.
    pub fn copy(&self, sketch: &Sketch, destination: &Url) -> Result<Url> {
        let source = sketch.path()?;
        if !source.exists() {
            return Err(SketchStoreError::sketch_not_accessible(source));
        }

        if sketch.uri == *destination {
            self.do_load_sketch(&sketch.uri, false)?;
            return Ok(sketch.uri.clone());
        }

        let destination_path = file_uri::to_path(destination)?;
        let staging_root = create_temp_folder(&self.temp_root)?;
        let staging = staging_root.join(&sketch.name);
        fs::create_dir_all(&staging).map_err(|e| SketchStoreError::io_at(&staging, e))?;

        let main_file_path = file_uri::to_path(&sketch.main_file_uri)?;
        let main_file_name = main_file_path
            .file_name()
            .ok_or_else(|| SketchStoreError::invalid_uri(sketch.main_file_uri.as_str()))?;

        let staged_main_file = self.copy_sketch_folder(main_file_name, &source, &staging)?;
        self.copy_sketch_folder(&staged_main_file, &staging, &destination_path)?;

        if let Err(e) = fs::remove_dir_all(&staging_root) {
            log::warn!(
                "Could not remove staging folder {}: {e}",
                staging_root.display()
            );
        }

        file_uri::from_path(&destination_path)
    }

    /// Copy `from` into `to` and rename the main file `main_file_name` after `to`.
    /// Returns the main file name in `to`.
    fn copy_sketch_folder(
        &self,
        main_file_name: &OsStr,
        from: &Path,
        to: &Path,
    ) -> Result<OsString> {
        copy_dir_all(from, to)?;

        let new_name = to
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| SketchStoreError::sketch_not_accessible(to))?;

        let old_path = to.join(main_file_name);
        let new_main_file_name = OsString::from(format!("{new_name}.ino"));
        let new_path = to.join(&new_main_file_name);
        if old_path != new_path {
            fs::rename(&old_path, &new_path).map_err(|e| SketchStoreError::io_at(&old_path, e))?;
        }

        self.do_load_sketch(&file_uri::from_path(to)?, false)?;
        Ok(new_main_file_name)
    }

    /// Archive `sketch` to `destination` through the toolchain, replacing any
    /// existing archive
    pub fn archive(&self, sketch: &SketchRef, destination: &Url) -> Result<Url> {
        self.do_load_sketch(&sketch.uri, false)?;

        let archive_path = file_uri::to_path(destination)?;
        if archive_path.exists() {
            fs::remove_file(&archive_path).map_err(|e| SketchStoreError::io_at(&archive_path, e))?;
        }

        self.toolchain
            .archive_sketch(&sketch.path()?, &archive_path)?;
        Ok(destination.clone())
    }

    pub fn delete_sketch(&self, sketch: &SketchRef) -> Result<()> {
        let sketch_path = sketch.path()?;
        let mut attempt = 0;

        loop {
            match fs::remove_dir_all(&sketch_path) {
                Ok(()) => {
                    log::info!("Successfully deleted sketch at {}.", sketch_path.display());
                    return Ok(());
                }
                Err(e) if attempt < MAX_DELETE_RETRIES && is_transient(&e) => {
                    attempt += 1;
                    log::debug!(
                        "Deleting {} failed ({e}), retry {attempt}/{MAX_DELETE_RETRIES}",
                        sketch_path.display()
                    );
                    std::thread::sleep(DELETE_RETRY_DELAY * attempt);
                }
                Err(e) => {
                    log::error!("Failed to delete sketch at {}: {e}", sketch_path.display());
                    return Err(SketchStoreError::io_at(&sketch_path, e));
                }
            }
        }
    }

    pub fn get_ide_temp_folder_path(&self, sketch: &SketchRef) -> Result<PathBuf> {
        let sketch_path = sketch.path()?;
        fs::read_dir(&sketch_path).map_err(|e| SketchStoreError::io_at(&sketch_path, e))?;
        Ok(build_folder_for(&self.temp_root, &sketch_path))
    }

    pub fn get_ide_temp_folder_uri(&self, sketch: &SketchRef) -> Result<Url> {
        file_uri::from_path(&self.get_ide_temp_folder_path(sketch)?)
    }

    /// The blueprint content for new sketches, read once per store
    fn load_ino_content(&self) -> Result<String> {
        if let Some(content) = self.blueprint.get() {
            return Ok(content.clone());
        }

        let content = match read_ino_blueprint_setting(&self.config_dir)? {
            Some(blueprint_path) => match fs::read_to_string(&blueprint_path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!(
                        "Blueprint {} does not exist, using the default sketch.",
                        blueprint_path.display()
                    );
                    DEFAULT_INO.to_string()
                }
                Err(e) => return Err(SketchStoreError::io_at(&blueprint_path, e)),
            },
            None => DEFAULT_INO.to_string(),
        };

        Ok(self.blueprint.get_or_init(|| content).clone())
    }

    // === Recently opened sketches ===

    fn recent_sketches_file(&self) -> RecentSketchesFile {
        RecentSketchesFile::in_config_dir(&self.config_dir)
    }

    fn lock_recent_sketches(&self) -> MutexGuard<'_, Option<Vec<SketchWithDetails>>> {
        self.recent_sketches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the sketch at `uri` as just opened.
    ///
    /// Temp workspace sketches and sketches that no longer load are skipped. Returns
    /// whether the sketch was recorded.
    pub fn mark_as_recently_opened(&self, uri: &Url) -> Result<bool> {
        let mut cache = self.lock_recent_sketches();
        log::debug!("Marking sketch at '{uri}' as recently opened.");

        if is_temp_sketch(&self.temp_root, &file_uri::to_path(uri)?) {
            log::debug!(
                "Sketch at '{uri}' is pointing to a temp location. Not marking as recently opened."
            );
            return Ok(false);
        }

        let sketch = match self.do_load_sketch(uri, false) {
            Ok(sketch) => sketch,
            Err(e) if e.is_not_found_or_invalid_name() => {
                log::debug!("Could not load sketch from '{uri}'. Not marking as recently opened.");
                return Ok(false);
            }
            Err(e) => {
                log::error!("Unexpected error occurred while loading sketch from '{uri}': {e}");
                return Err(e);
            }
        };

        let file = self.recent_sketches_file();
        let mut data = file.load()?;
        let now = now_ms();
        log::debug!("Marking sketch '{}' as recently opened with timestamp: '{now}'.", sketch.uri);
        if let Some((evicted_uri, timestamp)) = record_opened(&mut data, sketch.uri.as_str(), now) {
            log::debug!("Deleted sketch entry {evicted_uri} ({timestamp}) from recently opened.");
        }
        file.save(&data)?;
        log::debug!("Marked sketch '{uri}' as recently opened.");

        let sketches = self.resolve_recent_sketches(&file, &data)?;
        *cache = Some(sketches.clone());
        self.notifier.recent_sketches_did_change(&sketches);
        Ok(true)
    }

    /// The recently opened sketches, most recent first.
    ///
    /// Served from memory after the first call unless `force_update` is set. A refresh
    /// drops entries that no longer load, rewrites the record without them and
    /// notifies subscribers.
    pub fn recently_opened_sketches(&self, force_update: bool) -> Result<Vec<SketchWithDetails>> {
        let mut cache = self.lock_recent_sketches();
        if let Some(sketches) = cache.as_ref() {
            if !force_update {
                return Ok(sketches.clone());
            }
        }

        let file = self.recent_sketches_file();
        let data = file.load()?;
        let sketches = self.resolve_recent_sketches(&file, &data)?;
        if sketches.len() != data.len() {
            self.notifier.recent_sketches_did_change(&sketches);
        }

        *cache = Some(sketches.clone());
        Ok(sketches)
    }

    /// Load every recorded sketch, most recent first, persisting the record without
    /// the entries that failed
    fn resolve_recent_sketches(
        &self,
        file: &RecentSketchesFile,
        data: &RecentSketches,
    ) -> Result<Vec<SketchWithDetails>> {
        let mut sketches = Vec::new();
        let mut kept = RecentSketches::new();

        for uri in by_recency(data) {
            let loaded = Url::parse(&uri)
                .map_err(|_| SketchStoreError::invalid_uri(uri.as_str()))
                .and_then(|parsed| self.do_load_sketch(&parsed, false));
            match loaded {
                Ok(sketch) => {
                    kept.insert(uri.clone(), data[&uri]);
                    sketches.push(sketch);
                }
                Err(e) => log::debug!("Dropping recently opened sketch {uri}: {e}"),
            }
        }

        if kept.len() != data.len() {
            file.save(&kept)?;
        }
        Ok(sketches)
    }
}

/// Check whether `path` points at something that looks like a sketch, even one with
/// a mismatching folder name.
///
/// Returns `path` itself for a `.ino` file, the lexicographically first `.ino` file
/// for a directory, and `path` for a directory without `.ino` files only when
/// `fallback_to_invalid_folder_path` is set. `None` when nothing matches or the path
/// does not exist.
pub fn is_accessible_sketch_path(
    path: &Path,
    fallback_to_invalid_folder_path: bool,
) -> Result<Option<PathBuf>> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SketchStoreError::io_at(path, e)),
    };

    if metadata.is_file() {
        let is_ino = path.to_string_lossy().ends_with(".ino");
        return Ok(is_ino.then(|| path.to_path_buf()));
    }

    let mut sketch_filenames: Vec<String> = fs::read_dir(path)
        .map_err(|e| SketchStoreError::io_at(path, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".ino"))
        .collect();
    // Directory enumeration order is unspecified
    sketch_filenames.sort();

    match sketch_filenames.first() {
        Some(name) => Ok(Some(path.join(name))),
        None if fallback_to_invalid_folder_path => Ok(Some(path.to_path_buf())),
        None => Ok(None),
    }
}

fn sketch_from_response(response: LoadSketchResponse) -> Result<Sketch> {
    let to_uris = |paths: Vec<PathBuf>| -> Result<Vec<Url>> {
        paths.iter().map(|path| file_uri::from_path(path)).collect()
    };

    let name = response
        .location_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Sketch {
        sketch_ref: SketchRef {
            name,
            uri: file_uri::from_path(&response.location_path)?,
        },
        main_file_uri: file_uri::from_path(&response.main_file)?,
        other_sketch_file_uris: to_uris(response.other_sketch_files)?,
        additional_file_uris: to_uris(response.additional_files)?,
        root_folder_file_uris: to_uris(response.root_folder_files)?,
    })
}

/// Recursively copy the contents of `from` into `to`, merging with what is there
fn copy_dir_all(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|_| SketchStoreError::sketch_not_accessible(entry.path()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| SketchStoreError::io_at(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| SketchStoreError::io_at(entry.path(), e))?;
        }
    }
    Ok(())
}

fn is_transient(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::PermissionDenied
            | ErrorKind::ResourceBusy
            | ErrorKind::DirectoryNotEmpty
            | ErrorKind::Interrupted
    )
}

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
