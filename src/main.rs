//! nanosite - A minimal static site generator.

mod build;
mod cli;
mod compiler;
mod config;
mod data;
mod error;
mod init;
mod logger;
mod serve;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use init::new_site;
use serve::build_and_serve;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = cli.site_root();

    match &cli.command {
        Commands::Init { .. } => {
            new_site(&root)?;
            log!("init"; "created site in {}", root.display());
            Ok(())
        }
        Commands::Build { quiet } => build_site(&root, !quiet).map(|_| ()),
        Commands::Serve { interface, port } => build_and_serve(&root, interface.as_deref(), *port),
    }
}
