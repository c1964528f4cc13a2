//! Centralized path resolution for the reserved site layout.
//!
//! # Architecture
//!
//! ```text
//! SitePaths::new(root)
//!     │
//!     ├── output        → root/_site
//!     ├── includes      → root/_includes
//!     ├── layouts       → root/_layouts
//!     ├── passthrough   → root/_content
//!     └── group_dir()   → root/_<group>
//! ```

use super::defaults::{INCLUDES_DIR, LAYOUTS_DIR, PASSTHROUGH_DIR, RESERVED_PREFIX, SITE_DIR};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Absolute locations of every reserved directory of one site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    /// Site root (holds the config file)
    pub root: PathBuf,
    /// Output root
    pub output: PathBuf,
    /// Fragment templates
    pub includes: PathBuf,
    /// Layout templates
    pub layouts: PathBuf,
    /// Passthrough root, copied flat into `output`
    pub passthrough: PathBuf,
}

impl SitePaths {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            output: root.join(SITE_DIR),
            includes: root.join(INCLUDES_DIR),
            layouts: root.join(LAYOUTS_DIR),
            passthrough: root.join(PASSTHROUGH_DIR),
        }
    }

    /// Reserved source directory of a directory group, e.g. `posts` → `root/_posts`.
    pub fn group_dir(&self, group: &str) -> PathBuf {
        self.root.join(format!("{RESERVED_PREFIX}{group}"))
    }

    /// Filesystem location of a logical source name.
    ///
    /// Root-level names resolve against the root, group names (`posts/a.md`)
    /// against the group's reserved directory.
    pub fn source_path(&self, group: Option<&str>, file: &str) -> PathBuf {
        match group {
            Some(group) => self.group_dir(group).join(file),
            None => self.root.join(file),
        }
    }

    /// Create every reserved directory that does not exist yet.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.output, &self.includes, &self.layouts, &self.passthrough] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}
