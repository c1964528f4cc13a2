//! Verbatim copy of static files into the output root.
//!
//! ```text
//! root/
//! ├── css/style.css      → _site/css/style.css
//! ├── favicon.ico        → _site/favicon.ico
//! ├── index.html         (listed in `files`: rendered, not copied)
//! ├── _content/robots.txt → _site/robots.txt
//! └── _posts/…           (reserved: skipped)
//! ```
//!
//! Existing destinations are overwritten. Copying runs before rendering, so
//! a rendered page always wins over a copied file at the same location.

use crate::config::defaults::RESERVED_PREFIX;
use crate::config::{FileSpec, SitePaths};
use crate::log;
use anyhow::{Context, Result};
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files never copied.
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Copies non-reserved top-level entries and the passthrough directory.
pub struct StaticAssetCopier<'a> {
    paths: &'a SitePaths,
    /// Sources the render pass produces instead
    excluded: HashSet<PathBuf>,
    verbose: bool,
}

impl<'a> StaticAssetCopier<'a> {
    pub fn new(paths: &'a SitePaths, specs: &[FileSpec], verbose: bool) -> Self {
        let excluded = specs
            .iter()
            .filter_map(|spec| match spec {
                FileSpec::File(file) => Some(paths.root.join(file)),
                FileSpec::Group(_) => None,
            })
            .collect();
        Self {
            paths,
            excluded,
            verbose,
        }
    }

    /// Copy everything; returns the number of files written.
    pub fn copy_all(&self) -> Result<usize> {
        let mut copied = 0;

        for entry in fs::read_dir(&self.paths.root)
            .with_context(|| format!("Failed to list {}", self.paths.root.display()))?
        {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with(RESERVED_PREFIX) {
                continue;
            }
            copied += self.copy_tree(&entry.path(), &self.paths.root)?;
        }

        if self.paths.passthrough.is_dir() {
            for entry in fs::read_dir(&self.paths.passthrough).with_context(|| {
                format!("Failed to list {}", self.paths.passthrough.display())
            })? {
                copied += self.copy_tree(&entry?.path(), &self.paths.passthrough)?;
            }
        }

        Ok(copied)
    }

    /// Copy a file, or a directory recursively, to the same location
    /// relative to `base` below the output root.
    fn copy_tree(&self, from: &Path, base: &Path) -> Result<usize> {
        let mut copied = 0;

        for entry in WalkDir::new(from).follow_links(true) {
            let entry = entry.with_context(|| format!("Failed to walk {}", from.display()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || self.excluded.contains(path)
                || IGNORED_FILES.contains(&entry.file_name().to_string_lossy().as_ref())
            {
                continue;
            }

            let relative = path.strip_prefix(base)?;
            let dest = self.paths.output.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::copy(path, &dest).with_context(|| {
                format!("Failed to copy {} to {}", path.display(), dest.display())
            })?;

            if self.verbose {
                log!("assets"; "{}", relative.display());
            }
            copied += 1;
        }

        Ok(copied)
    }
}
