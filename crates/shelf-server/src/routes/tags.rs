//! GET /tags endpoint

use axum::{extract::State, Json};

use crate::middleware::error::ApiResult;
use crate::state::AppState;
use crate::types::TagItem;

/// List every visible tag, alphabetically. The reserved sync-marker tag
/// never appears.
#[utoipa::path(
    get,
    path = "/tags",
    tag = "catalog",
    responses(
        (status = 200, description = "All visible tags", body = [TagItem])
    )
)]
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<TagItem>>> {
    let tags = state.store.list_tags()?;
    Ok(Json(tags.into_iter().map(TagItem::from).collect()))
}
