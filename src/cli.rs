//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// nanosite static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new site skeleton
    #[command(alias = "new")]
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Build the site once into `_site`
    Build {
        /// Only report errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Build, then serve `_site`, rebuilding before every page request
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Site root the command operates on.
    pub fn site_root(&self) -> PathBuf {
        let root = self.root.as_deref().unwrap_or(Path::new("./"));
        match &self.command {
            Commands::Init { name: Some(name) } => root.join(name),
            _ => root.to_path_buf(),
        }
    }
}
