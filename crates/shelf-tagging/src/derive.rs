//! Tag derivation from registry payload fields and free text

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

/// Synonym table mapping raw registry strings to canonical tag names.
///
/// Strings not present in the table pass through unchanged.
static CANONICAL_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("image", "image-generation"),
        ("images", "image-generation"),
        ("text-to-image", "text-to-image"),
        ("video", "video-generation"),
        ("videos", "video-generation"),
        ("text-to-video", "text-to-video"),
        ("image-to-video", "image-to-video"),
        ("music", "music-generation"),
        ("audio", "audio"),
    ])
});

/// Keyword table used by the enrichment and retag passes. Substring match
/// against free text, each hit contributing one tag.
static KEYWORD_MAP: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("photoreal", "photoreal"),
        ("photo", "photoreal"),
        ("realistic", "photoreal"),
        ("anime", "anime"),
        ("cartoon", "cartoon"),
        ("3d", "3d"),
        ("portrait", "portrait"),
        ("character", "characters"),
        ("face", "portrait"),
        ("style", "style"),
        ("upscale", "upscaler"),
        ("nsfw", "nsfw"),
        ("text", "text-rendering"),
        ("audio", "audio"),
        ("music", "music-generation"),
        ("video", "video-generation"),
        ("image", "image-generation"),
    ]
});

/// Lowercase-trim a raw tag string and map it through the synonym table.
pub fn canonical_tag(raw: &str) -> String {
    let normalized = raw.trim().to_lowercase();
    match CANONICAL_MAP.get(normalized.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => normalized,
    }
}

/// Derive the normalized tag set for a registry entry.
///
/// `list_values` are the string elements of the entry's `categories`,
/// `modalities` and `tags` fields; `description` contributes keyword tags on
/// top (union, not exclusive-or).
pub fn derive_tags<'a, I>(list_values: I, description: &str) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tags: BTreeSet<String> = list_values
        .into_iter()
        .map(canonical_tag)
        .filter(|t| !t.is_empty())
        .collect();
    tags.extend(description_tags(description));
    tags
}

/// Coarse modality tags from free text: literal substring scan for
/// "video", "image" and "music"/"audio".
pub fn description_tags(text: &str) -> BTreeSet<String> {
    let text = text.to_lowercase();
    let mut tags = BTreeSet::new();
    if text.contains("video") {
        tags.insert("video-generation".to_string());
    }
    if text.contains("image") {
        tags.insert("image-generation".to_string());
    }
    if text.contains("music") || text.contains("audio") {
        tags.insert("music-generation".to_string());
    }
    tags
}

/// Fine-grained keyword tags from free text, used when enriching models
/// with upstream descriptions.
pub fn keyword_tags(text: &str) -> BTreeSet<String> {
    let text = text.to_lowercase();
    KEYWORD_MAP
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, tag)| (*tag).to_string())
        .collect()
}
