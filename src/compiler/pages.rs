//! The render pass: turn scanned sources into files below the output root.
//!
//! Destinations are planned for every page before anything is rendered, so
//! a collision or a missing layout fails the build before any page is
//! written.

use super::meta::SourceFile;
use super::output::OutputResolver;
use super::templates::TemplateEngine;
use crate::error::BuildError;
use crate::log;
use anyhow::{Result, bail};
use serde_json::Value;
use std::{collections::HashMap, path::PathBuf};

/// Render and write every page; returns the number of files written.
///
/// Fails on the first error. Pages written before it are left in place.
pub fn write_pages(
    files: &[SourceFile],
    engine: &mut TemplateEngine,
    resolver: &OutputResolver<'_>,
    site: &Value,
    verbose: bool,
) -> Result<usize> {
    engine.check_layouts(files)?;
    let plan = plan_destinations(files, resolver)?;

    let mut written = 0;
    for (file, dest) in files.iter().zip(plan) {
        let Some(html) = engine.render(file, site)? else {
            continue;
        };
        if verbose {
            log!("render"; "{}", file.name);
        }
        resolver.write(&dest, &html)?;
        written += 1;
    }
    Ok(written)
}

/// Resolve every destination, rejecting two pages that write the same file.
fn plan_destinations(files: &[SourceFile], resolver: &OutputResolver<'_>) -> Result<Vec<PathBuf>> {
    let mut owners: HashMap<PathBuf, &str> = HashMap::with_capacity(files.len());
    let mut plan = Vec::with_capacity(files.len());

    for file in files {
        let dest = resolver.resolve(file)?;
        if let Some(first) = owners.insert(dest.clone(), &file.name) {
            bail!(BuildError::OutputCollision {
                dest,
                first: first.to_owned(),
                second: file.name.clone(),
            });
        }
        plan.push(dest);
    }

    Ok(plan)
}
