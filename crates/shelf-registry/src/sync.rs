//! Catalog sync passes
//!
//! The main sync walks the registry's paginated listing and imports each
//! page in its own transaction, so an upstream failure mid-run keeps every
//! fully fetched page. The backfill, retag and enrich passes are
//! best-effort per model: a failed detail fetch skips that model and the
//! pass moves on.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use shelf_store::{CatalogStore, NewModel, GENERIC_DESCRIPTION};

use crate::client::RegistryClient;
use crate::types::{RegistryError, RegistryModel};

/// Enriched descriptions are cut to this many characters.
const MAX_DESCRIPTION_CHARS: usize = 220;

/// Descriptions shorter than this are considered worth replacing when the
/// registry has a real one.
const MIN_KEPT_DESCRIPTION_LEN: usize = 40;

fn require_token(token: Option<&str>) -> Result<&str, RegistryError> {
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(RegistryError::MissingToken)
}

fn to_new_model(entry: RegistryModel) -> NewModel {
    let tags = entry.derived_tags().into_iter().collect();
    NewModel {
        vendor: entry.owner.clone().unwrap_or_else(|| "unknown".to_string()),
        name: entry.name.clone().unwrap_or_else(|| "model".to_string()),
        tags,
        description: Some(
            entry
                .description
                .clone()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| GENERIC_DESCRIPTION.to_string()),
        ),
        image_url: entry.cover().map(str::to_string),
    }
}

/// Walk the registry listing and import up to `limit` models. Each page
/// commits on its own, so models from earlier pages survive a failure on
/// a later one. Returns the number of entries processed.
pub async fn sync_catalog(
    store: &CatalogStore,
    client: &RegistryClient,
    token: Option<&str>,
    limit: usize,
) -> Result<usize, RegistryError> {
    let token = require_token(token)?;

    let mut imported = 0;
    let mut next_url = Some(client.base_url().to_string());

    while let Some(url) = next_url.take() {
        if imported >= limit {
            break;
        }
        let page = client.list_page(&url, token).await?;
        next_url = page.next;

        let batch: Vec<NewModel> = page
            .results
            .into_iter()
            .take(limit - imported)
            .map(to_new_model)
            .collect();
        imported += store.import_batch(&batch)?;
    }

    info!("Sync processed {} registry entries", imported);
    Ok(imported)
}

/// Replace placeholder images with real registry cover images. Models that
/// already carry an upstream image are left alone; models whose detail
/// fetch fails are skipped. Returns the number of images updated.
pub async fn backfill_images(
    store: &CatalogStore,
    client: &RegistryClient,
    token: Option<&str>,
) -> Result<usize, RegistryError> {
    let token = require_token(token)?;

    let mut updated = 0;
    for model in store.all_models()? {
        if shelf_tagging::is_upstream_image(&model.image_url) {
            continue;
        }
        let detail = match client.get_model(&model.vendor, &model.name, token).await {
            Ok(detail) => detail,
            Err(err) => {
                debug!(
                    "Skipping image backfill for {}/{}: {}",
                    model.vendor, model.name, err
                );
                continue;
            }
        };
        if let Some(cover) = detail.cover() {
            if cover != model.image_url {
                store.set_image_url(model.id, cover)?;
                updated += 1;
            }
        }
    }

    info!("Image backfill updated {} models", updated);
    Ok(updated)
}

/// Give untagged models another tagging pass. With a token the registry
/// detail record contributes its list fields; with or without one the
/// model's own text gets scanned. Returns (retagged, checked).
pub async fn retag_missing(
    store: &CatalogStore,
    client: &RegistryClient,
    token: Option<&str>,
) -> Result<(usize, usize), RegistryError> {
    let token = token.map(str::trim).filter(|t| !t.is_empty());

    let missing = store.models_without_tags()?;
    let checked = missing.len();
    let mut retagged = 0;

    for model in missing {
        let mut tags: BTreeSet<String> = BTreeSet::new();

        if let Some(token) = token {
            match client.get_model(&model.vendor, &model.name, token).await {
                Ok(detail) => tags.extend(detail.derived_tags()),
                Err(err) => {
                    debug!(
                        "Registry lookup failed for {}/{}: {}",
                        model.vendor, model.name, err
                    );
                }
            }
        }

        let own_text = format!("{} {} {}", model.vendor, model.name, model.description);
        tags.extend(shelf_tagging::description_tags(&own_text));

        if tags.is_empty() {
            continue;
        }
        let tags: Vec<String> = tags.into_iter().collect();
        store.attach_tags(model.id, &tags)?;
        retagged += 1;
    }

    info!("Retag pass tagged {} of {} untagged models", retagged, checked);
    Ok((retagged, checked))
}

/// Refresh descriptions and tags for the whole catalog from registry
/// detail records. Failed fetches skip the model. Returns the number of
/// models refreshed.
pub async fn enrich(
    store: &CatalogStore,
    client: &RegistryClient,
    token: Option<&str>,
) -> Result<usize, RegistryError> {
    let token = require_token(token)?;

    let mut enriched = 0;
    for model in store.all_models()? {
        let detail = match client.get_model(&model.vendor, &model.name, token).await {
            Ok(detail) => detail,
            Err(err) => {
                warn!(
                    "Skipping enrichment for {}/{}: {}",
                    model.vendor, model.name, err
                );
                continue;
            }
        };

        let fresh = detail.description.clone().unwrap_or_default();
        let fresh = fresh.trim();
        let stale = model.description.trim().eq_ignore_ascii_case(GENERIC_DESCRIPTION)
            || model.description.trim().len() < MIN_KEPT_DESCRIPTION_LEN;
        if !fresh.is_empty() && stale {
            let short: String = fresh.chars().take(MAX_DESCRIPTION_CHARS).collect();
            store.set_description(model.id, short.trim_end())?;
        }

        let mut tags = detail.derived_tags();
        tags.extend(shelf_tagging::keyword_tags(fresh));
        if matches!(
            detail.visibility.as_deref().map(str::to_lowercase).as_deref(),
            Some("public") | Some("verified") | Some("official")
        ) {
            tags.insert("official".to_string());
        }
        if !tags.is_empty() {
            let tags: Vec<String> = tags.into_iter().collect();
            store.attach_tags(model.id, &tags)?;
        }

        enriched += 1;
    }

    info!("Enrichment refreshed {} models", enriched);
    Ok(enriched)
}
