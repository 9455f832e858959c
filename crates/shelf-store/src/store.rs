//! Catalog storage over SQLite
//!
//! Schema and row-level operations. Write helpers take `&Connection` so the
//! same code runs inside a batch transaction (rusqlite's `Transaction`
//! derefs to `Connection`).

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use shelf_types::AppResult;

use crate::{DEFAULT_DESCRIPTION, RESERVED_TAG};

/// A stored model row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModelRecord {
    pub id: i64,
    pub vendor: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
}

/// A stored tag row.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagRecord {
    pub id: i64,
    pub name: String,
}

/// A model entry pending import, as produced by seeding or the sync
/// pipeline.
#[derive(Debug, Clone)]
pub struct NewModel {
    pub vendor: String,
    pub name: String,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// SQLite catalog database handle.
pub struct CatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogStore {
    /// Open (or create) the catalog database at the given path.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open a throwaway in-memory catalog, for tests.
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS models (
                id INTEGER PRIMARY KEY,
                vendor TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                image_url TEXT NOT NULL,
                UNIQUE (vendor, name)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_models_name ON models(name)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS model_tags (
                model_id INTEGER NOT NULL REFERENCES models(id),
                tag_id INTEGER NOT NULL REFERENCES tags(id),
                PRIMARY KEY (model_id, tag_id)
            )",
            [],
        )?;

        Ok(())
    }

    /// Look up a tag by name, creating it if absent. Idempotent.
    pub fn get_or_create_tag(&self, name: &str) -> AppResult<TagRecord> {
        let conn = self.conn.lock();
        get_or_create_tag_tx(&conn, name)
    }

    /// Create a model if no (vendor, name) row exists, attaching the given
    /// tags. Returns the record and whether it was created.
    ///
    /// Create-only: an existing model is returned unchanged, its tags and
    /// fields untouched. Enrichment passes are the only update path.
    pub fn upsert_model(
        &self,
        vendor: &str,
        name: &str,
        tags: &[String],
        description: Option<&str>,
        image_url: Option<&str>,
    ) -> AppResult<(ModelRecord, bool)> {
        let conn = self.conn.lock();
        upsert_model_tx(&conn, vendor, name, tags, description, image_url)
    }

    /// Import a batch of model entries in one transaction. Returns the
    /// number of entries processed (pre-existing models count too; an
    /// upsert hit is still a processed entry).
    pub fn import_batch(&self, entries: &[NewModel]) -> AppResult<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for entry in entries {
            upsert_model_tx(
                &tx,
                &entry.vendor,
                &entry.name,
                &entry.tags,
                entry.description.as_deref(),
                entry.image_url.as_deref(),
            )?;
        }
        tx.commit()?;
        Ok(entries.len())
    }

    /// Attach tags to an existing model, creating tags as needed.
    /// Already-attached tags are a no-op.
    pub fn attach_tags(&self, model_id: i64, tags: &[String]) -> AppResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        for tag in tags {
            let tag = get_or_create_tag_tx(&tx, tag)?;
            attach_tag_tx(&tx, model_id, tag.id)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// All models, ordered by (vendor, name).
    pub fn all_models(&self) -> AppResult<Vec<ModelRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, vendor, name, description, image_url FROM models
             ORDER BY vendor ASC, name ASC",
        )?;
        let rows = stmt.query_map([], row_to_model)?;
        collect_rows(rows)
    }

    /// Number of stored models.
    pub fn count_models(&self) -> AppResult<i64> {
        let conn = self.conn.lock();
        let count = conn.query_row("SELECT COUNT(*) FROM models", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Models with no tag associations at all (the reserved tag counts as a
    /// tag here).
    pub fn models_without_tags(&self) -> AppResult<Vec<ModelRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, vendor, name, description, image_url FROM models
             WHERE id NOT IN (SELECT model_id FROM model_tags)
             ORDER BY vendor ASC, name ASC",
        )?;
        let rows = stmt.query_map([], row_to_model)?;
        collect_rows(rows)
    }

    /// Tag names attached to a model, with the reserved tag hidden.
    pub fn visible_tags(&self, model_id: i64) -> AppResult<Vec<String>> {
        let conn = self.conn.lock();
        visible_tags_tx(&conn, model_id)
    }

    /// All tags except the reserved one, ordered by name.
    pub fn list_tags(&self) -> AppResult<Vec<TagRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name FROM tags WHERE name != ?1 ORDER BY name ASC",
        )?;
        let rows = stmt.query_map(params![RESERVED_TAG], |row| {
            Ok(TagRecord {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        collect_rows(rows)
    }

    /// Delete a tag and its associations. Returns how many tags were
    /// removed (0 or 1).
    pub fn remove_tag(&self, name: &str) -> AppResult<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let tag_id: Option<i64> = tx
            .query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| {
                row.get(0)
            })
            .optional()?;
        let removed = match tag_id {
            Some(tag_id) => {
                tx.execute("DELETE FROM model_tags WHERE tag_id = ?1", params![tag_id])?;
                tx.execute("DELETE FROM tags WHERE id = ?1", params![tag_id])?;
                1
            }
            None => 0,
        };
        tx.commit()?;
        Ok(removed)
    }

    /// Replace a model's image URL. Enrichment-only mutation path.
    pub fn set_image_url(&self, model_id: i64, image_url: &str) -> AppResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE models SET image_url = ?1 WHERE id = ?2",
            params![image_url, model_id],
        )?;
        Ok(())
    }

    /// Replace a model's description. Enrichment-only mutation path.
    pub fn set_description(&self, model_id: i64, description: &str) -> AppResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE models SET description = ?1 WHERE id = ?2",
            params![description, model_id],
        )?;
        Ok(())
    }

    /// Recompute every model's placeholder image from its current tags.
    /// Models whose image already matches are left alone. Returns
    /// (updated, total).
    pub fn update_placeholder_images(&self) -> AppResult<(usize, usize)> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let models = {
            let mut stmt = tx.prepare(
                "SELECT id, vendor, name, description, image_url FROM models",
            )?;
            let rows = stmt.query_map([], row_to_model)?;
            collect_rows(rows)?
        };

        let total = models.len();
        let mut updated = 0;
        for model in models {
            let tags = visible_tags_tx(&tx, model.id)?;
            let image = shelf_tagging::placeholder_image(&tags, &model.vendor, &model.name);
            if image != model.image_url {
                tx.execute(
                    "UPDATE models SET image_url = ?1 WHERE id = ?2",
                    params![image, model.id],
                )?;
                updated += 1;
            }
        }

        tx.commit()?;
        Ok((updated, total))
    }

    pub(crate) fn connection(&self) -> &Arc<Mutex<Connection>> {
        &self.conn
    }
}

fn row_to_model(row: &rusqlite::Row<'_>) -> rusqlite::Result<ModelRecord> {
    Ok(ModelRecord {
        id: row.get(0)?,
        vendor: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
    })
}

pub(crate) fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> AppResult<Vec<T>> {
    let mut result = Vec::new();
    for row in rows {
        result.push(row?);
    }
    Ok(result)
}

pub(crate) fn visible_tags_tx(conn: &Connection, model_id: i64) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name FROM tags t
         JOIN model_tags mt ON t.id = mt.tag_id
         WHERE mt.model_id = ?1 AND t.name != ?2
         ORDER BY t.name ASC",
    )?;
    let rows = stmt.query_map(params![model_id, RESERVED_TAG], |row| row.get(0))?;
    collect_rows(rows)
}

fn get_or_create_tag_tx(conn: &Connection, name: &str) -> AppResult<TagRecord> {
    let existing: Option<TagRecord> = conn
        .query_row("SELECT id, name FROM tags WHERE name = ?1", params![name], |row| {
            Ok(TagRecord {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()?;
    if let Some(tag) = existing {
        return Ok(tag);
    }
    conn.execute("INSERT INTO tags (name) VALUES (?1)", params![name])?;
    Ok(TagRecord {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

fn attach_tag_tx(conn: &Connection, model_id: i64, tag_id: i64) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO model_tags (model_id, tag_id) VALUES (?1, ?2)",
        params![model_id, tag_id],
    )?;
    Ok(())
}

fn find_model_tx(conn: &Connection, vendor: &str, name: &str) -> AppResult<Option<ModelRecord>> {
    let found = conn
        .query_row(
            "SELECT id, vendor, name, description, image_url FROM models
             WHERE vendor = ?1 AND name = ?2",
            params![vendor, name],
            row_to_model,
        )
        .optional()?;
    Ok(found)
}

fn upsert_model_tx(
    conn: &Connection,
    vendor: &str,
    name: &str,
    tags: &[String],
    description: Option<&str>,
    image_url: Option<&str>,
) -> AppResult<(ModelRecord, bool)> {
    if let Some(existing) = find_model_tx(conn, vendor, name)? {
        return Ok((existing, false));
    }

    let image_url = match image_url {
        Some(url) => url.to_string(),
        None => shelf_tagging::placeholder_image(tags, vendor, name).to_string(),
    };
    let description = description.unwrap_or(DEFAULT_DESCRIPTION);

    conn.execute(
        "INSERT INTO models (vendor, name, description, image_url)
         VALUES (?1, ?2, ?3, ?4)",
        params![vendor, name, description, image_url],
    )?;
    let model_id = conn.last_insert_rowid();

    for tag in tags {
        let tag = get_or_create_tag_tx(conn, tag)?;
        attach_tag_tx(conn, model_id, tag.id)?;
    }

    Ok((
        ModelRecord {
            id: model_id,
            vendor: vendor.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            image_url,
        },
        true,
    ))
}
