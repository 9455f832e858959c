//! POST /admin/* maintenance endpoints

use axum::{extract::State, http::HeaderMap, Json};

use shelf_registry::resolve_token;
use shelf_store::RESERVED_TAG;

use crate::middleware::error::ApiResult;
use crate::routes::bearer_token;
use crate::state::AppState;
use crate::types::{CleanupResponse, EnrichResponse, RetagResponse, UpdateImagesResponse};

/// Recompute every model's image from its current tags and the category
/// pools.
#[utoipa::path(
    post,
    path = "/admin/update-images",
    tag = "admin",
    responses(
        (status = 200, description = "Placeholder images reassigned", body = UpdateImagesResponse)
    )
)]
pub async fn update_images(
    State(state): State<AppState>,
) -> ApiResult<Json<UpdateImagesResponse>> {
    let (updated, total) = state.store.update_placeholder_images()?;
    Ok(Json(UpdateImagesResponse { updated, total }))
}

/// Re-run tag derivation for models with no tags at all. Works without a
/// token, using only each model's own text.
#[utoipa::path(
    post,
    path = "/admin/retag-missing",
    tag = "admin",
    responses(
        (status = 200, description = "Retag pass completed", body = RetagResponse)
    )
)]
pub async fn retag_missing_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RetagResponse>> {
    let token = resolve_token(bearer_token(&headers).as_deref());
    let (retagged_models, checked) =
        shelf_registry::retag_missing(&state.store, &state.registry, token.as_deref()).await?;
    Ok(Json(RetagResponse {
        retagged_models,
        checked,
    }))
}

/// Refresh descriptions and tags for the whole catalog from registry
/// detail records.
#[utoipa::path(
    post,
    path = "/admin/enrich",
    tag = "admin",
    responses(
        (status = 200, description = "Enrichment completed", body = EnrichResponse),
        (status = 400, description = "No API token available", body = crate::types::ErrorResponse)
    )
)]
pub async fn enrich_models(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<EnrichResponse>> {
    let token = resolve_token(bearer_token(&headers).as_deref());
    let enriched =
        shelf_registry::enrich(&state.store, &state.registry, token.as_deref()).await?;
    Ok(Json(EnrichResponse { enriched }))
}

/// Drop the reserved sync-marker tag and all its attachments.
#[utoipa::path(
    post,
    path = "/admin/cleanup-reserved-tag",
    tag = "admin",
    responses(
        (status = 200, description = "Reserved tag removed if present", body = CleanupResponse)
    )
)]
pub async fn cleanup_reserved_tag(
    State(state): State<AppState>,
) -> ApiResult<Json<CleanupResponse>> {
    let removed = state.store.remove_tag(RESERVED_TAG)?;
    Ok(Json(CleanupResponse { removed }))
}
