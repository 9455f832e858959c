//! Route handlers

pub mod admin;
pub mod models;
pub mod sync;
pub mod tags;

pub use admin::{cleanup_reserved_tag, enrich_models, retag_missing_models, update_images};
pub use models::list_models;
pub use sync::{sync_images, sync_models};
pub use tags::list_tags;

use axum::http::{header, HeaderMap};

/// Pull the bearer token out of the Authorization header, if any.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
