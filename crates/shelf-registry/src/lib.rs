//! Registry client and catalog sync pipeline
//!
//! Talks to the external model registry (Replicate's public API) and feeds
//! the catalog store: the main paginated sync, the image backfill, and the
//! best-effort retag/enrich passes.

pub mod client;
pub mod sync;
pub mod types;

pub use client::{resolve_token, RegistryClient, DEFAULT_REGISTRY_URL, TOKEN_ENV};
pub use sync::{backfill_images, enrich, retag_missing, sync_catalog};
pub use types::{RegistryError, RegistryModel, RegistryPage};
