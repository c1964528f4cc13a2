//! The global template context exposed to every page as `site`.

use super::store::Listings;
use serde_json::{Map, Value};

/// Configuration metadata, build time and every group's sibling listing.
#[derive(Debug, Clone)]
pub struct SiteData {
    /// Top-level config keys other than the reserved ones
    pub metadata: Map<String, Value>,
    /// Build start, unix seconds
    pub time: i64,
    /// Ordered headers per directory group
    pub listings: Listings,
}

impl SiteData {
    /// Assemble site data stamped with the current time.
    pub fn new(metadata: Map<String, Value>, listings: Listings) -> Self {
        Self {
            metadata,
            time: chrono::Utc::now().timestamp(),
            listings,
        }
    }

    /// Flatten into the mapping templates see.
    ///
    /// Later sources win on key clashes: metadata, then `time`, then groups.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        let mut site = self.metadata.clone();
        site.insert("time".into(), Value::from(self.time));
        for (group, headers) in self.listings.iter() {
            let list = headers
                .iter()
                .map(serde_json::to_value)
                .collect::<serde_json::Result<Vec<_>>>()?;
            site.insert(group.to_owned(), Value::Array(list));
        }
        Ok(Value::Object(site))
    }
}
