//! Tag normalization and placeholder image selection
//!
//! Pure functions over static tables: no storage handle, no I/O. The tag
//! deriver is a best-effort heuristic classifier; overlapping matches are
//! expected and tolerated (e.g. "imagen" triggers "image-generation").

pub mod derive;
pub mod images;

pub use derive::{canonical_tag, derive_tags, description_tags, keyword_tags};
pub use images::{is_upstream_image, placeholder_image, FALLBACK_IMAGE, UPSTREAM_IMAGE_MARKER};
