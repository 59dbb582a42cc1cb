//! CLI command definitions and dispatch

pub mod apply;
pub mod build;
pub mod config;
pub mod extract;
pub mod inspect;

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Apply a definition to a single baseline JSON file
    Apply {
        /// Definition file (.def)
        def: PathBuf,

        /// JSON file to patch
        json: PathBuf,

        /// Output file (patches the input in place if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Leave existing rows untouched when an add_row names them
        #[arg(long)]
        no_overwrite: bool,
    },

    /// Show the contents of a definition file
    Inspect {
        /// Definition file (.def)
        def: PathBuf,

        /// Print the parsed definition as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a mod archive from one or more definitions
    Build {
        /// Mod name (used for working directories and the archive name)
        mod_name: String,

        /// Definition files, applied in order
        #[arg(required = true)]
        defs: Vec<PathBuf>,

        /// Config file (defaults to the user config location)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert unpacked game assets into baseline JSON
    Extract {
        /// Directory of unpacked assets (defaults to <output_dir>/retoc)
        source: Option<PathBuf>,

        /// Config file (defaults to the user config location)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Manage the toolkit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default settings
    Init {
        /// Config file to create
        #[arg(long)]
        path: Option<PathBuf>,

        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Config file to read
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Check that the configured tools and directories are usable
    Check {
        /// Config file to read
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Apply {
                def,
                json,
                output,
                no_overwrite,
            } => apply::execute(def, json, output.as_deref(), !no_overwrite),
            Commands::Inspect { def, json } => inspect::execute(def, *json),
            Commands::Build {
                mod_name,
                defs,
                config,
            } => build::execute(mod_name, defs, config.as_deref()),
            Commands::Extract { source, config } => {
                extract::execute(source.as_deref(), config.as_deref())
            }
            Commands::Config { command } => command.execute(),
        }
    }
}

impl ConfigCommands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            ConfigCommands::Init { path, force } => config::init(path.as_deref(), *force),
            ConfigCommands::Show { path } => config::show(path.as_deref()),
            ConfigCommands::Check { path } => config::check(path.as_deref()),
        }
    }
}
