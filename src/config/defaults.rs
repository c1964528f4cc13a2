//! Reserved names and default values for configuration fields.
//!
//! The functions are used by serde for default deserialization.

// ============================================================================
// Reserved Layout
// ============================================================================

/// Prefix marking an entry as reserved (never copied verbatim into the output)
pub const RESERVED_PREFIX: &str = "_";

/// Config file names, probed in this order
pub const CONFIG_FILES: &[&str] = &["_config.yml", "_config.yaml", "_config.toml"];

/// Config file written by `init`
pub const DEFAULT_CONFIG_FILE: &str = "_config.yml";

/// Output root
pub const SITE_DIR: &str = "_site";

/// Reusable fragments
pub const INCLUDES_DIR: &str = "_includes";

/// Page wrappers
pub const LAYOUTS_DIR: &str = "_layouts";

/// Passthrough root, its contents are copied flat into the output root
pub const PASSTHROUGH_DIR: &str = "_content";

/// Extension of every rendered page
pub const PAGE_EXTENSION: &str = "html";

/// Extension of lightweight-markup sources
pub const MARKDOWN_EXTENSION: &str = "md";

/// File stem that marks a page as a directory index
pub const INDEX_STEM: &str = "index";

/// Header delimiter line
pub const HEADER_MARKER: &str = "---";

// ============================================================================
// `serve` Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        8000
    }
}
