//! Build error kinds.
//!
//! Every variant aborts the whole build. Pipeline functions return
//! `anyhow::Result` and raise these with `bail!`, so callers can still
//! recover the kind through `downcast_ref::<BuildError>()`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no site configuration found in `{0}` (expected `_config.yml`)")]
    MissingConfig(PathBuf),

    #[error("`{path}`: unsupported source type `.{extension}` (only .html and .md can be processed)")]
    UnsupportedSourceType { path: PathBuf, extension: String },

    #[error("`{name}`: layout `{layout}` not found in `_layouts`")]
    MissingLayout { name: String, layout: String },

    #[error("`{name}`: required field `{field}` is missing")]
    MissingRequiredField { name: String, field: String },

    #[error("`{0}`: header opened with `---` but never closed")]
    MalformedHeader(PathBuf),

    #[error("`{name}`: failed to render template")]
    Template {
        name: String,
        #[source]
        cause: tera::Error,
    },

    #[error("`{second}` and `{first}` both write `{dest}`")]
    OutputCollision {
        dest: PathBuf,
        first: String,
        second: String,
    },

    #[error("`{}`: `{first}` and `{second}` share a name", .dir.display())]
    DuplicateTemplate {
        dir: PathBuf,
        first: String,
        second: String,
    },

    #[error("`{name}`: output path `{path}` escapes the output directory")]
    InvalidOutputPath { name: String, path: String },
}
