//! OpenAPI specification generation
//!
//! Generates the OpenAPI 3.1 specification from route annotations using
//! utoipa.

use utoipa::OpenApi;

/// OpenAPI documentation builder.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ModelShelf API",
        version = "0.3.2",
        description = "Catalog of generative AI models with tag browsing, ranked search and registry sync"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        crate::routes::models::list_models,
        crate::routes::tags::list_tags,
        crate::routes::sync::sync_models,
        crate::routes::sync::sync_images,
        crate::routes::admin::update_images,
        crate::routes::admin::retag_missing_models,
        crate::routes::admin::enrich_models,
        crate::routes::admin::cleanup_reserved_tag,
        crate::health_check,
        crate::root_handler,
        crate::serve_openapi_json,
        crate::serve_openapi_yaml
    ),
    components(
        schemas(
            crate::types::ModelItem,
            crate::types::ModelsResponse,
            crate::types::TagItem,
            crate::types::SyncResponse,
            crate::types::BackfillResponse,
            crate::types::UpdateImagesResponse,
            crate::types::RetagResponse,
            crate::types::EnrichResponse,
            crate::types::CleanupResponse,
            crate::types::LivenessResponse,
            crate::types::ErrorResponse,
            crate::types::ApiError
        )
    ),
    tags(
        (name = "catalog", description = "Model and tag browsing"),
        (name = "sync", description = "Registry import and image backfill"),
        (name = "admin", description = "Catalog maintenance"),
        (name = "system", description = "Liveness and documentation")
    )
)]
pub struct ApiDoc;

/// Render the specification as pretty-printed JSON.
pub fn get_openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

/// Render the specification as YAML.
pub fn get_openapi_yaml() -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_generates_and_lists_endpoints() {
        let json = get_openapi_json().unwrap();
        let spec: serde_json::Value = serde_json::from_str(&json).unwrap();
        let paths = spec["paths"].as_object().unwrap();
        for path in [
            "/models",
            "/tags",
            "/sync",
            "/sync/images",
            "/admin/update-images",
            "/admin/retag-missing",
            "/admin/enrich",
            "/admin/cleanup-reserved-tag",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_yaml_renders() {
        let yaml = get_openapi_yaml().unwrap();
        assert!(yaml.contains("ModelShelf API"));
    }
}
