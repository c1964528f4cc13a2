//! Output path and url resolution.
//!
//! # Destination rules (first match wins)
//!
//! | Header            | Source              | Destination                |
//! |-------------------|---------------------|----------------------------|
//! | `path: blog/x`    | any                 | `blog/x/index.html`        |
//! | `url: about/`     | any                 | `about/index.html`         |
//! | `url: feed.xml`   | any                 | `feed.html`                |
//! | -                 | `index.html`        | `index.html`               |
//! | -                 | `posts/index.md`    | `posts/index.html`         |
//! | -                 | `posts/hello.md`    | `posts/hello/index.html`   |
//!
//! Every destination ends in the page extension, whatever the source was.

use super::meta::{Header, SourceFile};
use crate::config::defaults::{INDEX_STEM, PAGE_EXTENSION};
use crate::error::BuildError;
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// Url annotated onto a page header: the explicit override if present,
/// otherwise the logical name without its extension.
pub fn page_url(name: &str, header: &Header) -> String {
    if let Some(path) = header.path.as_ref().or(header.url.as_ref()) {
        return path.clone();
    }
    Path::new(name)
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/")
}

/// Maps rendered pages onto files below the output root.
#[derive(Debug, Clone, Copy)]
pub struct OutputResolver<'a> {
    output: &'a Path,
}

impl<'a> OutputResolver<'a> {
    pub const fn new(output: &'a Path) -> Self {
        Self { output }
    }

    /// Destination file of a page.
    pub fn resolve(&self, file: &SourceFile) -> Result<PathBuf> {
        let relative = if let Some(path) = &file.header.path {
            relative_path(path, &file.name)?.join(INDEX_STEM)
        } else if let Some(url) = &file.header.url {
            let relative = relative_path(url, &file.name)?;
            if url.ends_with('/') || relative.as_os_str().is_empty() {
                relative.join(INDEX_STEM)
            } else {
                relative
            }
        } else {
            let stem = relative_path(&file.name, &file.name)?.with_extension("");
            if stem.file_name().is_some_and(|n| n == INDEX_STEM) {
                stem
            } else {
                stem.join(INDEX_STEM)
            }
        };

        Ok(self.output.join(relative).with_extension(PAGE_EXTENSION))
    }

    /// Write a rendered page, creating intermediate directories.
    pub fn write(&self, dest: &Path, content: &str) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(dest, content).with_context(|| format!("Failed to write {}", dest.display()))
    }
}

/// Turn a `/`-separated location into a relative path that stays inside
/// the output root.
fn relative_path(location: &str, name: &str) -> Result<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(location.trim_start_matches(['/', '\\'])).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!(BuildError::InvalidOutputPath {
                    name: name.to_owned(),
                    path: location.to_owned(),
                })
            }
        }
    }
    Ok(relative)
}
