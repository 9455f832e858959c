//! Registry wire types and the sync error taxonomy

use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

use shelf_types::AppError;

/// Errors from the registry client and sync passes.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Missing registry API token")]
    MissingToken,

    #[error("Registry returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// One model entry from the registry. Every field is optional; payloads
/// in the wild are inconsistent and a partial entry must not abort a page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryModel {
    pub owner: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Category/modality/tag arrays sometimes hold non-string junk, so
    /// they deserialize loosely and get filtered on use.
    #[serde(default)]
    pub categories: Vec<serde_json::Value>,
    #[serde(default)]
    pub modalities: Vec<serde_json::Value>,
    #[serde(default)]
    pub tags: Vec<serde_json::Value>,
    pub cover_image_url: Option<String>,
    pub cover_image: Option<String>,
    pub visibility: Option<String>,
}

impl RegistryModel {
    /// The cover image URL, preferring the canonical field name.
    pub fn cover(&self) -> Option<&str> {
        self.cover_image_url
            .as_deref()
            .or(self.cover_image.as_deref())
            .filter(|url| !url.trim().is_empty())
    }

    /// Canonical tags derived from the entry's list fields plus its
    /// description.
    pub fn derived_tags(&self) -> BTreeSet<String> {
        let list_values = self
            .categories
            .iter()
            .chain(&self.modalities)
            .chain(&self.tags)
            .filter_map(|value| value.as_str());
        shelf_tagging::derive_tags(list_values, self.description.as_deref().unwrap_or(""))
    }
}

/// One page of the registry's model listing.
#[derive(Debug, Deserialize)]
pub struct RegistryPage {
    #[serde(default)]
    pub results: Vec<RegistryModel>,
    /// Absolute URL of the next page, absent on the last one.
    pub next: Option<String>,
}
