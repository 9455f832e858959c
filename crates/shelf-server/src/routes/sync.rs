//! POST /sync endpoints
//!
//! Both take the registry token from the Authorization header, falling
//! back to the environment.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};

use shelf_registry::{backfill_images, resolve_token, sync_catalog};

use crate::middleware::error::ApiResult;
use crate::routes::bearer_token;
use crate::state::AppState;
use crate::types::{BackfillResponse, SyncQuery, SyncResponse, DEFAULT_SYNC_LIMIT};

/// Import models from the registry listing, up to `limit` entries.
#[utoipa::path(
    post,
    path = "/sync",
    tag = "sync",
    params(SyncQuery),
    responses(
        (status = 200, description = "Sync completed", body = SyncResponse),
        (status = 400, description = "No API token available", body = crate::types::ErrorResponse),
        (status = 502, description = "Registry failure", body = crate::types::ErrorResponse)
    )
)]
pub async fn sync_models(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<SyncResponse>> {
    let token = resolve_token(bearer_token(&headers).as_deref());
    let limit = query.limit.unwrap_or(DEFAULT_SYNC_LIMIT);
    let imported = sync_catalog(&state.store, &state.registry, token.as_deref(), limit).await?;
    Ok(Json(SyncResponse { imported }))
}

/// Replace placeholder images with real registry cover images.
#[utoipa::path(
    post,
    path = "/sync/images",
    tag = "sync",
    responses(
        (status = 200, description = "Backfill completed", body = BackfillResponse),
        (status = 400, description = "No API token available", body = crate::types::ErrorResponse)
    )
)]
pub async fn sync_images(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<BackfillResponse>> {
    let token = resolve_token(bearer_token(&headers).as_deref());
    let updated = backfill_images(&state.store, &state.registry, token.as_deref()).await?;
    Ok(Json(BackfillResponse { updated }))
}
