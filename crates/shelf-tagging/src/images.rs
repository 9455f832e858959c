//! Deterministic placeholder image selection
//!
//! Maps a model's tag set to a category-themed stock image. The same
//! (vendor, name) always resolves to the same URL; models sharing a category
//! are spread across the category pool via a stable hash.

use sha2::{Digest, Sha256};

/// Substring marking a real upstream cover image, as opposed to one of the
/// placeholder pools below.
pub const UPSTREAM_IMAGE_MARKER: &str = "replicate";

/// Fallback when no category matches.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1519681393784-d120267933ba?q=80&w=1600&auto=format&fit=crop";

// Pools are fixed ordered lists; duplicates are kept as-is so the modulo
// index stays stable.
const IMAGE_GEN_POOL: [&str; 4] = [
    "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1547036967-23d11aacaee0?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1518709268805-4e9042af2176?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1558618047-3c8c76ca7d13?q=80&w=1600&auto=format&fit=crop",
];

const VIDEO_GEN_POOL: [&str; 4] = [
    "https://images.unsplash.com/photo-1523580494863-6f3031224c94?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1574717024653-61fd2cf4d44d?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1492691527719-9d1e07e534b4?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1578662996442-48f60103fc96?q=80&w=1600&auto=format&fit=crop",
];

const MUSIC_GEN_POOL: [&str; 4] = [
    "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?q=80&w=1600&auto=format&fit=crop",
];

const TEXT_MODEL_POOL: [&str; 3] = [
    "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1516321318423-f06f85e504b3?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1434030216411-0b793f4b4173?q=80&w=1600&auto=format&fit=crop",
];

const THREE_D_POOL: [&str; 3] = [
    "https://images.unsplash.com/photo-1635070041078-e363dbe005cb?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1558618047-3c8c76ca7d13?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1635070041078-e363dbe005cb?q=80&w=1600&auto=format&fit=crop",
];

const GAME_MODEL_POOL: [&str; 3] = [
    "https://images.unsplash.com/photo-1493711662062-fa541adb3fc8?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1511512578047-dfb367046420?q=80&w=1600&auto=format&fit=crop",
    "https://images.unsplash.com/photo-1556438064-2d7646166914?q=80&w=1600&auto=format&fit=crop",
];

/// Check whether an image URL points at a real upstream cover image rather
/// than a placeholder.
pub fn is_upstream_image(url: &str) -> bool {
    url.contains(UPSTREAM_IMAGE_MARKER)
}

/// Stable 128-bit hash of `"{vendor}/{name}"` for pool indexing.
fn model_hash(vendor: &str, name: &str) -> u128 {
    let digest = Sha256::digest(format!("{}/{}", vendor, name).as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(bytes)
}

fn pick(pool: &'static [&'static str], hash: u128) -> &'static str {
    pool[(hash % pool.len() as u128) as usize]
}

fn has_any(tags: &[String], wanted: &[&str]) -> bool {
    tags.iter().any(|t| wanted.contains(&t.as_str()))
}

/// Select a placeholder image for a model from its tag set.
///
/// Category precedence, first match wins: video, music, image, game world,
/// 3D, text/design, then the single fixed fallback.
pub fn placeholder_image(tags: &[String], vendor: &str, name: &str) -> &'static str {
    let hash = model_hash(vendor, name);

    if has_any(tags, &["video-generation", "text-to-video", "image-to-video"]) {
        pick(&VIDEO_GEN_POOL, hash)
    } else if has_any(tags, &["music-generation", "audio"]) {
        pick(&MUSIC_GEN_POOL, hash)
    } else if has_any(tags, &["image-generation", "text-to-image", "inpainting"]) {
        pick(&IMAGE_GEN_POOL, hash)
    } else if has_any(tags, &["game-world-creation"]) {
        pick(&GAME_MODEL_POOL, hash)
    } else if has_any(tags, &["3d"]) {
        pick(&THREE_D_POOL, hash)
    } else if has_any(tags, &["text-rendering", "design"]) {
        pick(&TEXT_MODEL_POOL, hash)
    } else {
        FALLBACK_IMAGE
    }
}
