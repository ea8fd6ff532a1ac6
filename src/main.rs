use clap::{Parser, Subcommand};
use sketch_store::commands::*;
use sketch_store::core::{
    command_init::StoreOptions,
    error::{Result, SketchStoreError},
    print_error,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sketch-store")]
#[command(about = "Discover, load and manage Arduino sketches")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding config.json, settings.json and recent-sketches.json
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Sketchbook directory, overrides the configured one
    #[arg(long, global = true, value_name = "DIR")]
    sketchbook: Option<PathBuf>,

    /// Path to the arduino-cli executable
    #[arg(long, global = true, value_name = "PATH")]
    cli: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sketches of the sketchbook or of ROOT
    List {
        /// Folder to list instead of the sketchbook
        root: Option<String>,
    },
    /// Load and show a sketch
    Load {
        /// Sketch folder path or file:// URI
        sketch: String,
    },
    /// Show the sketch that contains a file or folder
    Folder {
        /// Any path inside a sketch
        path: String,
    },
    /// Create a new sketch in a temp workspace
    New,
    /// Copy a sketch into a temp workspace
    Clone {
        /// Sketch folder path or file:// URI
        sketch: String,
    },
    /// Copy a sketch to a new location
    Copy {
        /// Sketch folder path or file:// URI
        sketch: String,
        /// Destination folder, its name becomes the sketch name
        destination: String,
    },
    /// Archive a sketch into a zip file
    Archive {
        /// Sketch folder path or file:// URI
        sketch: String,
        /// Archive file to create, replaced if it exists
        destination: String,
    },
    /// Delete a sketch folder
    Delete {
        /// Sketch folder path or file:// URI
        sketch: String,
    },
    /// Mark a sketch as recently opened
    Open {
        /// Sketch folder path or file:// URI
        sketch: String,
    },
    /// Show recently opened sketches
    Recent {
        /// Re-check every entry and drop sketches that no longer load
        #[arg(long)]
        refresh: bool,
    },
    /// Print the build folder of a sketch
    BuildDir {
        /// Sketch folder path or file:// URI
        sketch: String,
    },
}

fn run(command: Commands, options: &StoreOptions) -> Result<()> {
    match command {
        Commands::List { root } => execute_list(options, root),
        Commands::Load { sketch } => execute_load(options, &sketch),
        Commands::Folder { path } => execute_folder(options, &path),
        Commands::New => execute_new(options),
        Commands::Clone { sketch } => execute_clone(options, &sketch),
        Commands::Copy {
            sketch,
            destination,
        } => execute_copy(options, &sketch, &destination),
        Commands::Archive {
            sketch,
            destination,
        } => execute_archive(options, &sketch, &destination),
        Commands::Delete { sketch } => execute_delete(options, &sketch),
        Commands::Open { sketch } => execute_open(options, &sketch),
        Commands::Recent { refresh } => execute_recent(options, refresh),
        Commands::BuildDir { sketch } => execute_build_dir(options, &sketch),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let options = StoreOptions {
        config_dir: cli.config_dir,
        sketchbook: cli.sketchbook,
        cli: cli.cli,
        json: cli.json,
    };

    if let Err(e) = run(cli.command, &options) {
        match &e {
            SketchStoreError::InvalidName { main_file_uri, .. } => print_error(&format!(
                "Invalid sketch name. The main file {main_file_uri} must match its folder name"
            )),
            _ => print_error(&e.to_string()),
        }
        std::process::exit(1);
    }
}
