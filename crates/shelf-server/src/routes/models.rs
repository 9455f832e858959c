//! GET /models endpoint
//!
//! Filtered, ranked and paginated catalog listing.

use axum::{
    extract::{Query, State},
    Json,
};

use shelf_store::SearchQuery;

use crate::middleware::error::ApiResult;
use crate::state::AppState;
use crate::types::{ModelsQuery, ModelsResponse, DEFAULT_PER_PAGE};

/// Search the catalog. Results are ordered by quality score, with
/// (vendor, name) breaking ties.
#[utoipa::path(
    get,
    path = "/models",
    tag = "catalog",
    params(ModelsQuery),
    responses(
        (status = 200, description = "One page of matching models", body = ModelsResponse)
    )
)]
pub async fn list_models(
    State(state): State<AppState>,
    Query(query): Query<ModelsQuery>,
) -> ApiResult<Json<ModelsResponse>> {
    let search = SearchQuery {
        text: query.q.clone(),
        tags: query.tag_list(),
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(DEFAULT_PER_PAGE),
    };
    let page = state.store.search(&search)?;
    Ok(Json(page.into()))
}
