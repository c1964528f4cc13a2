//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── SitePaths::ensure_dirs()      _site, _includes, _layouts, _content
//!     ├── SiteConfig::load()            fails if no _config.yml
//!     ├── TemplateRegistry::load()
//!     │
//!     ├── StaticAssetCopier             non-reserved entries + _content
//!     │
//!     ├── SourceScanner::scan()         first pass → SourceFile[] + Listings
//!     ├── SiteData::to_value()          metadata + time + listings
//!     │
//!     └── write_pages()                 second pass → _site/**/index.html
//! ```
//!
//! The build is synchronous and fails fast. Files written before a failure
//! stay in place.

use crate::{
    compiler::{
        assets::StaticAssetCopier,
        output::OutputResolver,
        pages::write_pages,
        scan::SourceScanner,
        templates::{TemplateEngine, TemplateRegistry},
    },
    config::{SiteConfig, SitePaths},
    data::SiteData,
    log,
};
use anyhow::{Context, Result};
use std::path::Path;

/// Everything a build needs, resolved once up front.
pub struct BuildContext {
    pub paths: SitePaths,
    pub config: SiteConfig,
    pub templates: TemplateRegistry,
    pub verbose: bool,
}

impl BuildContext {
    /// Prepare the reserved layout and load config and templates.
    pub fn load(root: &Path, verbose: bool) -> Result<Self> {
        let paths = SitePaths::new(root);
        paths.ensure_dirs()?;
        let config = SiteConfig::load(root)?;
        let templates = TemplateRegistry::load(&paths)?;

        Ok(Self {
            paths,
            config,
            templates,
            verbose,
        })
    }
}

/// Counts reported after a successful build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered pages written
    pub pages: usize,
    /// Static files copied
    pub assets: usize,
    /// Sources parsed but not rendered (hidden or header-only)
    pub skipped: usize,
}

/// Build the site rooted at `root` once.
pub fn build_site(root: &Path, verbose: bool) -> Result<BuildReport> {
    let ctx = BuildContext::load(root, verbose)?;
    run(&ctx)
}

fn run(ctx: &BuildContext) -> Result<BuildReport> {
    let files = ctx.config.files();

    let assets = StaticAssetCopier::new(&ctx.paths, files, ctx.verbose).copy_all()?;

    let scan = SourceScanner::new(&ctx.paths, &ctx.config.required_fields).scan(files)?;
    if ctx.verbose {
        log!("scan"; "{} pages, {} groups", scan.files.len(), scan.listings.len());
    }

    let site = SiteData::new(ctx.config.metadata.clone(), scan.listings)
        .to_value()
        .context("Failed to serialize site data")?;

    let mut engine = TemplateEngine::new(&ctx.templates)?;
    let resolver = OutputResolver::new(&ctx.paths.output);
    let pages = write_pages(&scan.files, &mut engine, &resolver, &site, ctx.verbose)?;

    let report = BuildReport {
        pages,
        assets,
        skipped: scan.skipped,
    };
    if ctx.verbose {
        log!(
            "build";
            "done: {} pages, {} assets, {} skipped",
            report.pages,
            report.assets,
            report.skipped
        );
    }
    Ok(report)
}
