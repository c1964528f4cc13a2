//! The build pipeline.
//!
//! - **frontmatter**: Split headers from bodies, convert markdown
//! - **meta**: Header and source records
//! - **scan**: Expand the `files` list (first pass)
//! - **templates**: Fragment/layout registry and the two-pass renderer
//! - **output**: Destination and url resolution
//! - **pages**: Render and write every page (second pass)
//! - **assets**: Verbatim copy of static files
//!
//! # Build Flow
//!
//! ```text
//! StaticAssetCopier ──► _site/
//!
//! SourceScanner ──► SourceFile[] + Listings ──► SiteData
//!                         │                        │
//!                         ▼                        ▼
//!                   OutputResolver ◄── write_pages (TemplateEngine)
//! ```

pub mod assets;
pub mod frontmatter;
pub mod meta;
pub mod output;
pub mod pages;
pub mod scan;
pub mod templates;
