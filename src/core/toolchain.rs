//! The toolchain collaborator that decides what a sketch is.
//!
//! The sketch store never decides on its own whether a folder is a sketch. It asks a
//! [`Toolchain`] and trusts a positive answer. [`ArduinoCli`] is the implementation
//! used by the command line front end: sketch loading follows the Arduino sketch
//! folder rules directly on disk, archiving is delegated to the `arduino-cli`
//! executable.
//!
//! # Public API
//! - [`Toolchain`]: load and archive contract
//! - [`LoadSketchResponse`]: file listing of a loaded sketch
//! - [`ToolchainError`]: NotFound-class and other failures
//! - [`ArduinoCli`]: default implementation

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions a main sketch file may have
pub const MAIN_FILE_EXTENSIONS: [&str; 2] = ["ino", "pde"];

/// Extensions picked up as additional files anywhere inside the sketch folder
pub const ADDITIONAL_FILE_EXTENSIONS: [&str; 11] = [
    "h", "c", "hpp", "hh", "cpp", "S", "adoc", "md", "json", "tpp", "ipp",
];

#[derive(Error, Debug)]
pub enum ToolchainError {
    /// The requested path does not resolve to a sketch
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Failed(String),

    #[error("failed to run toolchain: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadSketchResponse {
    pub location_path: PathBuf,
    pub main_file: PathBuf,
    pub other_sketch_files: Vec<PathBuf>,
    pub additional_files: Vec<PathBuf>,
    pub root_folder_files: Vec<PathBuf>,
}

pub trait Toolchain: Send + Sync {
    fn load_sketch(&self, sketch_path: &Path) -> Result<LoadSketchResponse, ToolchainError>;

    /// Create a zip archive of the sketch. The archive path must not exist yet.
    fn archive_sketch(&self, sketch_path: &Path, archive_path: &Path)
        -> Result<(), ToolchainError>;
}

pub struct ArduinoCli {
    cli_path: PathBuf,
}

impl ArduinoCli {
    pub const DEFAULT_BINARY: &'static str = "arduino-cli";

    pub fn new(cli_path: impl Into<PathBuf>) -> Self {
        Self {
            cli_path: cli_path.into(),
        }
    }

    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    /// Execute an `arduino-cli` command, mapping a non-zero exit to its stderr
    fn execute_cli_command(&self, mut cmd: Command) -> Result<(), ToolchainError> {
        log::debug!("Running toolchain command: {cmd:?}");
        let output = cmd.output()?;

        if !output.status.success() {
            let error_msg = String::from_utf8_lossy(&output.stderr);
            return Err(ToolchainError::Failed(format!(
                "{} command failed: {}",
                self.cli_path.display(),
                error_msg.trim()
            )));
        }

        Ok(())
    }
}

impl Default for ArduinoCli {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BINARY)
    }
}

impl Toolchain for ArduinoCli {
    fn load_sketch(&self, sketch_path: &Path) -> Result<LoadSketchResponse, ToolchainError> {
        load_sketch_folder(sketch_path)
    }

    fn archive_sketch(
        &self,
        sketch_path: &Path,
        archive_path: &Path,
    ) -> Result<(), ToolchainError> {
        let mut cmd = Command::new(&self.cli_path);
        cmd.arg("sketch")
            .arg("archive")
            .arg(sketch_path)
            .arg(archive_path);
        self.execute_cli_command(cmd)
    }
}

fn cant_open(detail: impl std::fmt::Display) -> ToolchainError {
    ToolchainError::NotFound(format!("Can't open sketch: {detail}"))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Load a sketch folder following the Arduino sketch specification.
///
/// A file path loads its parent folder. The folder must contain exactly one of
/// `<folder>.ino` or `<folder>.pde`. Every failure to open is a NotFound.
pub fn load_sketch_folder(sketch_path: &Path) -> Result<LoadSketchResponse, ToolchainError> {
    let metadata = fs::metadata(sketch_path).map_err(cant_open)?;
    let folder = if metadata.is_dir() {
        sketch_path.to_path_buf()
    } else {
        sketch_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| cant_open(format!("no parent folder for {}", sketch_path.display())))?
    };

    let folder_name = folder
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| cant_open(format!("invalid sketch folder {}", folder.display())))?
        .to_string();

    let main_candidates: Vec<PathBuf> = MAIN_FILE_EXTENSIONS
        .iter()
        .map(|ext| folder.join(format!("{folder_name}.{ext}")))
        .filter(|candidate| candidate.is_file())
        .collect();

    let main_file = match main_candidates.as_slice() {
        [] => {
            return Err(cant_open(format!(
                "main file missing from sketch: {}",
                folder.join(format!("{folder_name}.ino")).display()
            )))
        }
        [main_file] => main_file.clone(),
        _ => {
            return Err(cant_open(format!(
                "multiple main sketch files found ({})",
                main_candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    };

    let mut response = LoadSketchResponse {
        location_path: folder.clone(),
        main_file: main_file.clone(),
        ..Default::default()
    };

    let walker = WalkDir::new(&folder)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("Skipping unreadable entry in {}: {e}", folder.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let in_root = entry.depth() == 1;
        if in_root {
            response.root_folder_files.push(path.clone());
        }
        if path == main_file {
            continue;
        }

        match extension_of(&path) {
            Some(ext) if in_root && MAIN_FILE_EXTENSIONS.contains(&ext) => {
                response.other_sketch_files.push(path)
            }
            Some(ext) if ADDITIONAL_FILE_EXTENSIONS.contains(&ext) => {
                response.additional_files.push(path)
            }
            _ => {}
        }
    }

    response.other_sketch_files.sort();
    response.additional_files.sort();
    response.root_folder_files.sort();

    Ok(response)
}
