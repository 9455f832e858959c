//! SQLite-backed catalog store
//!
//! Owns the Model, Tag and ModelTag entities. The store is an explicit
//! handle passed to every operation so tests can swap in throwaway
//! databases; there is no module-level singleton.

pub mod search;
pub mod seed;
pub mod store;

pub use search::{ModelHit, SearchPage, SearchQuery};
pub use seed::seed_if_empty;
pub use store::{CatalogStore, ModelRecord, NewModel, TagRecord};

/// Marker tag left behind by earlier sync runs; hidden from API responses
/// and removable only via the admin cleanup operation.
pub const RESERVED_TAG: &str = "replicate";

/// Description given to synced models whose payload carries none. Treated
/// as "generic" by the ranking and enrichment passes.
pub const GENERIC_DESCRIPTION: &str = "Model from Replicate";

/// Description given to seeded models that carry none of their own.
pub const DEFAULT_DESCRIPTION: &str = "A pro version of Seedance that offers text-to-video and \
     image-to-video support for 5s or 10s videos, at 480p and 1080p resolution";
