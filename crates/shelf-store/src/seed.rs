//! Demo catalog seeding
//!
//! Applied once at startup when the catalog is empty. Re-seeding never
//! refreshes existing rows: the upsert is create-only, so a changed seed
//! entry only takes effect on a fresh database.

use shelf_types::AppResult;
use tracing::info;

use crate::store::{CatalogStore, NewModel};

/// Tags created up front so the tag browser is populated even before any
/// sync has run.
pub const DEFAULT_TAGS: [&str; 14] = [
    "text-to-video",
    "image-to-video",
    "1080p",
    "multi-shot",
    "video-generation",
    "audio",
    "game-world-creation",
    "lip-sync",
    "text-to-image",
    "image-generation",
    "inpainting",
    "text-rendering",
    "design",
    "music-generation",
];

struct SeedEntry {
    vendor: &'static str,
    name: &'static str,
    tags: &'static [&'static str],
    description: Option<&'static str>,
}

const SEED_MODELS: &[SeedEntry] = &[
    SeedEntry {
        vendor: "bytedance",
        name: "seedance-1-pro",
        tags: &["text-to-video", "1080p", "multi-shot"],
        description: None,
    },
    SeedEntry {
        vendor: "bytedance",
        name: "seedance-1-lite",
        tags: &["text-to-video", "image-to-video"],
        description: None,
    },
    SeedEntry {
        vendor: "openai",
        name: "sora-x",
        tags: &["video-generation", "text-to-video", "1080p"],
        description: None,
    },
    SeedEntry {
        vendor: "stability",
        name: "stable-video",
        tags: &["image-to-video", "lip-sync"],
        description: None,
    },
    SeedEntry {
        vendor: "meta",
        name: "vidpress",
        tags: &["video-generation", "audio"],
        description: None,
    },
    SeedEntry {
        vendor: "runway",
        name: "gen3",
        tags: &["text-to-video", "1080p", "lip-sync"],
        description: None,
    },
    SeedEntry {
        vendor: "nvidia",
        name: "omni-v",
        tags: &["game-world-creation", "image-generation"],
        description: None,
    },
    SeedEntry {
        vendor: "google",
        name: "imagen-video",
        tags: &["text-to-image", "image-to-video", "1080p"],
        description: None,
    },
    SeedEntry {
        vendor: "bytedance",
        name: "seedance-1-max",
        tags: &["text-to-video", "inpainting"],
        description: None,
    },
    SeedEntry {
        vendor: "bytedance",
        name: "seedance-1-mini",
        tags: &["design", "text-rendering"],
        description: None,
    },
    SeedEntry {
        vendor: "anthropic",
        name: "claude-vision-video",
        tags: &["video-generation", "audio"],
        description: None,
    },
    SeedEntry {
        vendor: "xai",
        name: "grok-video",
        tags: &["text-to-video", "1080p"],
        description: None,
    },
    SeedEntry {
        vendor: "ideogram",
        name: "ideogram",
        tags: &["image-generation"],
        description: Some("Ideogram - image generation model"),
    },
    SeedEntry {
        vendor: "google",
        name: "imagen-4",
        tags: &["image-generation"],
        description: Some("Imagen-4 - image generation model"),
    },
    SeedEntry {
        vendor: "black-forest-labs",
        name: "flux-kontext",
        tags: &["image-generation"],
        description: Some("FluxKontext - image generation model"),
    },
    SeedEntry {
        vendor: "kling",
        name: "kling-v2.1",
        tags: &["video-generation", "text-to-video"],
        description: Some("Kling v2.1 - video generation"),
    },
    SeedEntry {
        vendor: "minimax",
        name: "minimax-video",
        tags: &["video-generation"],
        description: Some("Minimax Video - video generation"),
    },
    SeedEntry {
        vendor: "bytedance",
        name: "seedance",
        tags: &["video-generation", "text-to-video"],
        description: Some("Seedance - video generation"),
    },
    SeedEntry {
        vendor: "google",
        name: "veo3-8s",
        tags: &["video-generation"],
        description: Some("Veo3 (8s) - video generation"),
    },
    SeedEntry {
        vendor: "minimax",
        name: "minimax-music",
        tags: &["music-generation", "audio"],
        description: Some("Minimax Music - music generation"),
    },
    SeedEntry {
        vendor: "meta",
        name: "musicgen",
        tags: &["music-generation", "audio"],
        description: Some("MusicGen - music generation"),
    },
    SeedEntry {
        vendor: "chatterbox",
        name: "chatterbox",
        tags: &["music-generation", "audio"],
        description: Some("Chatterbox - music generation"),
    },
];

/// Seed the demo catalog if the store is empty. Returns the number of
/// models imported (0 when the catalog already has content).
pub fn seed_if_empty(store: &CatalogStore) -> AppResult<usize> {
    if store.count_models()? > 0 {
        return Ok(0);
    }

    for tag in DEFAULT_TAGS {
        store.get_or_create_tag(tag)?;
    }

    let batch: Vec<NewModel> = SEED_MODELS
        .iter()
        .map(|entry| NewModel {
            vendor: entry.vendor.to_string(),
            name: entry.name.to_string(),
            tags: entry.tags.iter().map(|t| t.to_string()).collect(),
            description: entry.description.map(str::to_string),
            image_url: None,
        })
        .collect();
    let imported = store.import_batch(&batch)?;

    info!("Seeded demo catalog with {} models", imported);
    Ok(imported)
}
