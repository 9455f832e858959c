//! API request and response types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use shelf_store::{ModelHit, SearchPage, TagRecord};

/// Default page size for the model listing.
pub const DEFAULT_PER_PAGE: i64 = 12;

/// Default cap on entries processed per sync run.
pub const DEFAULT_SYNC_LIMIT: usize = 200;

/// One catalog model as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelItem {
    pub id: i64,

    /// Display title, "vendor/name".
    #[schema(example = "bytedance/seedance-1-pro")]
    pub title: String,

    pub vendor: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub tags: Vec<String>,
}

impl From<ModelHit> for ModelItem {
    fn from(hit: ModelHit) -> Self {
        Self {
            id: hit.model.id,
            title: format!("{}/{}", hit.model.vendor, hit.model.name),
            vendor: hit.model.vendor,
            name: hit.model.name,
            description: hit.model.description,
            image_url: hit.model.image_url,
            tags: hit.tags,
        }
    }
}

/// Paginated model listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    pub items: Vec<ModelItem>,
    pub total: usize,
    pub page: i64,
    pub per_page: i64,
    pub pages: usize,
}

impl From<SearchPage> for ModelsResponse {
    fn from(page: SearchPage) -> Self {
        Self {
            items: page.items.into_iter().map(ModelItem::from).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            pages: page.pages,
        }
    }
}

/// Query parameters for GET /models.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ModelsQuery {
    /// Case-insensitive substring over vendor, name and description.
    pub q: Option<String>,

    /// Comma-separated tag names; models matching any of them are included.
    pub tags: Option<String>,

    /// 1-based page number, defaults to 1.
    pub page: Option<i64>,

    /// Page size, defaults to 12, capped at 60.
    pub per_page: Option<i64>,
}

impl ModelsQuery {
    /// Split the CSV tag filter into clean tag names.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One tag as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagItem {
    pub id: i64,
    pub name: String,
}

impl From<TagRecord> for TagItem {
    fn from(tag: TagRecord) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Query parameters for POST /sync.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SyncQuery {
    /// Cap on registry entries processed, defaults to 200.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SyncResponse {
    /// Registry entries processed (pre-existing models included).
    pub imported: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BackfillResponse {
    /// Models whose image was replaced with a registry cover.
    pub updated: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateImagesResponse {
    /// Models whose placeholder image was reassigned.
    pub updated: usize,
    /// Models examined.
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RetagResponse {
    pub retagged_models: usize,
    /// Untagged models examined.
    pub checked: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrichResponse {
    /// Models refreshed from registry detail records.
    pub enriched: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CleanupResponse {
    /// 1 when the reserved tag existed and was removed, 0 otherwise.
    pub removed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub ok: bool,
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    #[schema(example = "Missing registry API token")]
    pub message: String,

    #[serde(rename = "type")]
    #[schema(example = "invalid_request_error")]
    pub error_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiError {
                message: message.into(),
                error_type: error_type.into(),
                code: None,
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error.code = Some(code.into());
        self
    }
}
