//! Site-wide data shared by every render.
//!
//! The scan pass fills [`Listings`] with the headers of every kept page,
//! grouped by directory group. [`SiteData`] combines them with the config
//! metadata into the `site` mapping each template sees, so an index page
//! can enumerate its siblings regardless of render order.
//!
//! ```text
//! _config.yml ──► metadata ──┐
//!                            ├──► SiteData ──► site.title, site.time, site.posts[..]
//! scan pass ───► Listings ───┘
//! ```

mod store;
mod types;

pub use store::Listings;
pub use types::SiteData;
