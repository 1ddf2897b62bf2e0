//! Command-line interface definitions for bmt.
//!
//! All argument parsing lives here, using clap's derive macros, so the
//! definitions are shared between the binary and the integration tests.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Main CLI structure for bmt.
#[derive(Parser)]
#[command(
    name = "bmt",
    version = crate::VERSION,
    about = "Game mod manifest tracker",
    long_about = "Discovers mod manifest files under a project root, honoring .gitignore \
                  files the way git does, and remembers which mods are included"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a project in the current directory and run a first scan
    Init {
        /// Do not honor .gitignore files during the scan
        #[arg(long)]
        no_gitignore: bool,

        /// Extra ignore pattern in gitignore syntax (repeatable)
        #[arg(short, long = "ignore", value_name = "PATTERN")]
        ignore: Vec<String>,
    },

    /// Rescan the project for mod manifests
    FindMods {
        /// Do not honor .gitignore files during the scan
        #[arg(long)]
        no_gitignore: bool,

        /// Extra ignore pattern in gitignore syntax (repeatable)
        #[arg(short, long = "ignore", value_name = "PATTERN")]
        ignore: Vec<String>,
    },

    /// List remembered mods and their inclusion state
    List,

    /// Mark a mod as included
    Include {
        /// Mod name as recorded in the state file
        name: String,
    },

    /// Mark a mod as excluded
    Exclude {
        /// Mod name as recorded in the state file
        name: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
