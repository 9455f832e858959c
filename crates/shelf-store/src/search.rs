//! Catalog search and ranking
//!
//! Substring and tag filtering happen in SQL; scoring and pagination happen
//! on the fetched set, since the quality score needs each model's tag set.

use rusqlite::params_from_iter;

use shelf_types::AppResult;

use crate::store::{collect_rows, visible_tags_tx, CatalogStore, ModelRecord};
use crate::GENERIC_DESCRIPTION;

/// Page size bounds for the search API.
pub const MAX_PER_PAGE: i64 = 60;

/// A search request. `page` and `per_page` are clamped, not rejected.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring over vendor, name and description.
    pub text: Option<String>,
    /// Require at least one of these tag names to be attached.
    pub tags: Vec<String>,
    /// 1-based page number; values below 1 clamp to 1.
    pub page: i64,
    /// Page size; clamped to 1..=60.
    pub per_page: i64,
}

/// A matched model together with its visible tag set.
#[derive(Debug, Clone)]
pub struct ModelHit {
    pub model: ModelRecord,
    pub tags: Vec<String>,
}

/// One page of ranked search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub items: Vec<ModelHit>,
    pub total: usize,
    pub page: i64,
    pub per_page: i64,
    pub pages: usize,
}

/// Static quality score for ranking; lower sorts first.
///
/// -2: tagged "image-generation"
/// -1: carries a real upstream image
///  0: tagged, non-generic description, not "official"
///  1: tagged "official"
///  2: everything else (untagged or generic description)
pub fn quality_score(model: &ModelRecord, tags: &[String]) -> i32 {
    let tag_set: Vec<&str> = tags.iter().map(String::as_str).collect();
    let generic_desc = {
        let d = model.description.trim().to_lowercase();
        d.is_empty() || d == GENERIC_DESCRIPTION.to_lowercase()
    };

    if tag_set.contains(&"image-generation") {
        return -2;
    }
    if shelf_tagging::is_upstream_image(&model.image_url) {
        return -1;
    }
    if !tag_set.is_empty() && !generic_desc && !tag_set.contains(&"official") {
        return 0;
    }
    if tag_set.contains(&"official") {
        return 1;
    }
    2
}

impl CatalogStore {
    /// Filter, rank and paginate the catalog.
    pub fn search(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        let page = query.page.max(1);
        let per_page = query.per_page.clamp(1, MAX_PER_PAGE);

        let conn = self.connection().lock();

        let mut sql = String::from(
            "SELECT m.id, m.vendor, m.name, m.description, m.image_url FROM models m",
        );
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if !query.tags.is_empty() {
            sql.push_str(
                " JOIN model_tags mt ON m.id = mt.model_id JOIN tags t ON t.id = mt.tag_id",
            );
            let placeholders = vec!["?"; query.tags.len()].join(", ");
            clauses.push(format!("t.name IN ({})", placeholders));
            params.extend(query.tags.iter().cloned());
        }

        if let Some(text) = query.text.as_deref() {
            let text = text.trim().to_lowercase();
            if !text.is_empty() {
                let like = format!("%{}%", text);
                clauses.push(
                    "(LOWER(m.vendor) LIKE ? OR LOWER(m.name) LIKE ? \
                     OR LOWER(m.description) LIKE ?)"
                        .to_string(),
                );
                params.extend([like.clone(), like.clone(), like]);
            }
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if !query.tags.is_empty() {
            // Suppress duplicate rows from the tag join
            sql.push_str(" GROUP BY m.id");
        }
        sql.push_str(" ORDER BY m.vendor ASC, m.name ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok(ModelRecord {
                id: row.get(0)?,
                vendor: row.get(1)?,
                name: row.get(2)?,
                description: row.get(3)?,
                image_url: row.get(4)?,
            })
        })?;
        let models = collect_rows(rows)?;

        let mut hits = Vec::with_capacity(models.len());
        for model in models {
            let tags = visible_tags_tx(&conn, model.id)?;
            hits.push(ModelHit { model, tags });
        }

        let total = hits.len();
        // Stable sort: ties keep the (vendor, name) ordering from SQL
        hits.sort_by_key(|hit| quality_score(&hit.model, &hit.tags));

        let pages = total.div_ceil(per_page as usize);
        let start = ((page - 1) * per_page) as usize;
        let items: Vec<ModelHit> = hits
            .into_iter()
            .skip(start)
            .take(per_page as usize)
            .collect();

        Ok(SearchPage {
            items,
            total,
            page,
            per_page,
            pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RESERVED_TAG;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn query() -> SearchQuery {
        SearchQuery {
            page: 1,
            per_page: 12,
            ..Default::default()
        }
    }

    /// Models covering every score level sort into the exact priority order.
    #[test]
    fn test_ranking_total_order() {
        let store = CatalogStore::open_in_memory().unwrap();

        // score 2: no tags, generic description
        store
            .upsert_model("a-vendor", "generic", &[], Some(GENERIC_DESCRIPTION), None)
            .unwrap();
        // score 1: tagged "official"
        store
            .upsert_model("b-vendor", "official-model", &tags(&["official"]), Some("An official model"), None)
            .unwrap();
        // score 0: tagged, non-generic description, not official
        store
            .upsert_model("c-vendor", "decent", &tags(&["x"]), Some("A well described model"), None)
            .unwrap();
        // score -1: real upstream image, no tags
        store
            .upsert_model(
                "d-vendor",
                "covered",
                &[],
                Some(GENERIC_DESCRIPTION),
                Some("https://replicate.delivery/pbxt/cover.webp"),
            )
            .unwrap();
        // score -2: tagged image-generation
        store
            .upsert_model("e-vendor", "painter", &tags(&["image-generation"]), Some("Paints"), None)
            .unwrap();

        let page = store.search(&query()).unwrap();
        let names: Vec<&str> = page.items.iter().map(|h| h.model.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["painter", "covered", "decent", "official-model", "generic"]
        );
    }

    #[test]
    fn test_ties_preserve_vendor_name_order() {
        let store = CatalogStore::open_in_memory().unwrap();
        for vendor in ["zeta", "alpha", "mid"] {
            store
                .upsert_model(vendor, "m", &tags(&["image-generation"]), Some("paints"), None)
                .unwrap();
        }
        let page = store.search(&query()).unwrap();
        let vendors: Vec<&str> = page.items.iter().map(|h| h.model.vendor.as_str()).collect();
        assert_eq!(vendors, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_substring_filter_is_case_insensitive() {
        let store = CatalogStore::open_in_memory().unwrap();
        store
            .upsert_model("acme", "ClipGen", &[], Some("video tool"), None)
            .unwrap();
        store
            .upsert_model("other", "painter", &[], Some("image tool"), None)
            .unwrap();

        let mut q = query();
        q.text = Some("CLIPGEN".to_string());
        let page = store.search(&q).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].model.name, "ClipGen");

        // Description matches too
        q.text = Some("image tool".to_string());
        let page = store.search(&q).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].model.name, "painter");
    }

    #[test]
    fn test_tag_filter_dedups_multi_tag_matches() {
        let store = CatalogStore::open_in_memory().unwrap();
        store
            .upsert_model("acme", "both", &tags(&["audio", "lip-sync"]), Some("x"), None)
            .unwrap();

        let mut q = query();
        q.tags = tags(&["audio", "lip-sync"]);
        let page = store.search(&q).unwrap();
        // Two matching tag joins, one result row
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_pagination_clamps() {
        let store = CatalogStore::open_in_memory().unwrap();
        for i in 0..3 {
            store
                .upsert_model("acme", &format!("m{}", i), &[], Some("x"), None)
                .unwrap();
        }

        // per_page 0 clamps to 1
        let page = store
            .search(&SearchQuery {
                page: 1,
                per_page: 0,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pages, 3);

        // per_page 1000 clamps to 60
        let page = store
            .search(&SearchQuery {
                page: 1,
                per_page: 1000,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.per_page, 60);
        assert_eq!(page.pages, 1);

        // page 0 and negative clamp to 1
        for bad_page in [0, -5] {
            let page = store
                .search(&SearchQuery {
                    page: bad_page,
                    per_page: 2,
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(page.page, 1);
            assert_eq!(page.items.len(), 2);
        }
    }

    #[test]
    fn test_reserved_tag_invisible_to_scoring() {
        let store = CatalogStore::open_in_memory().unwrap();
        // Reserved tag only + generic description: scores 2, not 0
        store
            .upsert_model("acme", "synced", &tags(&[RESERVED_TAG]), Some(GENERIC_DESCRIPTION), None)
            .unwrap();
        let page = store.search(&query()).unwrap();
        assert_eq!(quality_score(&page.items[0].model, &page.items[0].tags), 2);
    }
}
