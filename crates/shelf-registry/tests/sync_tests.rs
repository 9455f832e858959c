//! Sync pipeline tests against a mock registry

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelf_registry::{backfill_images, enrich, retag_missing, sync_catalog};
use shelf_registry::{RegistryClient, RegistryError};
use shelf_store::{CatalogStore, GENERIC_DESCRIPTION};

fn client_for(server: &MockServer) -> RegistryClient {
    RegistryClient::new(format!("{}/v1/models", server.uri()))
}

#[tokio::test]
async fn test_sync_imports_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "owner": "acme",
                    "name": "clipgen",
                    "description": "Turns text into video clips",
                    "categories": ["text-to-video"],
                    "cover_image_url": "https://replicate.delivery/cover.webp"
                },
                {
                    "owner": "acme",
                    "name": "painter",
                    "categories": ["image"]
                }
            ],
            "next": null
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::open_in_memory().unwrap();
    let imported = sync_catalog(&store, &client_for(&server), Some("test-token"), 200)
        .await
        .unwrap();

    assert_eq!(imported, 2);
    let models = store.all_models().unwrap();
    assert_eq!(models.len(), 2);

    let clipgen = models.iter().find(|m| m.name == "clipgen").unwrap();
    assert_eq!(clipgen.image_url, "https://replicate.delivery/cover.webp");
    assert!(store
        .visible_tags(clipgen.id)
        .unwrap()
        .contains(&"text-to-video".to_string()));

    // No cover: the category placeholder kicks in
    let painter = models.iter().find(|m| m.name == "painter").unwrap();
    assert!(painter.image_url.starts_with("https://"));
    assert_eq!(painter.description, GENERIC_DESCRIPTION);
}

#[tokio::test]
async fn test_sync_respects_limit() {
    let server = MockServer::start().await;
    let results: Vec<_> = (0..10)
        .map(|i| json!({"owner": "acme", "name": format!("m{}", i)}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": results,
            "next": format!("{}/v1/models?cursor=2", server.uri())
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::open_in_memory().unwrap();
    let imported = sync_catalog(&store, &client_for(&server), Some("tok"), 4)
        .await
        .unwrap();

    // The limit cuts within the first page, so the next page is never fetched
    assert_eq!(imported, 4);
    assert_eq!(store.count_models().unwrap(), 4);
}

#[tokio::test]
async fn test_sync_keeps_earlier_pages_on_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(query_param("cursor", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"owner": "acme", "name": "survivor-1"},
                {"owner": "acme", "name": "survivor-2"}
            ],
            "next": format!("{}/v1/models?cursor=2", server.uri())
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::open_in_memory().unwrap();
    let err = sync_catalog(&store, &client_for(&server), Some("tok"), 200)
        .await
        .unwrap_err();

    match err {
        RegistryError::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {}", other),
    }

    // Page one committed before the failure
    assert_eq!(store.count_models().unwrap(), 2);
}

#[tokio::test]
async fn test_sync_requires_token() {
    let server = MockServer::start().await;
    let store = CatalogStore::open_in_memory().unwrap();

    let err = sync_catalog(&store, &client_for(&server), None, 200)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::MissingToken));

    // Nothing hit the mock server and nothing was stored
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(store.count_models().unwrap(), 0);
}

#[tokio::test]
async fn test_backfill_replaces_placeholders_and_skips_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models/acme/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "owner": "acme",
            "name": "plain",
            "cover_image_url": "https://replicate.delivery/real.webp"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/models/acme/broken"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let store = CatalogStore::open_in_memory().unwrap();
    // Placeholder image, eligible for backfill
    let (plain, _) = store.upsert_model("acme", "plain", &[], None, None).unwrap();
    // Detail fetch fails, skipped without aborting the pass
    store.upsert_model("acme", "broken", &[], None, None).unwrap();
    // Already carries an upstream image, never re-fetched
    store
        .upsert_model(
            "acme",
            "covered",
            &[],
            None,
            Some("https://replicate.delivery/old.webp"),
        )
        .unwrap();

    let updated = backfill_images(&store, &client_for(&server), Some("tok"))
        .await
        .unwrap();

    assert_eq!(updated, 1);
    let models = store.all_models().unwrap();
    let plain = models.iter().find(|m| m.id == plain.id).unwrap();
    assert_eq!(plain.image_url, "https://replicate.delivery/real.webp");
    let covered = models.iter().find(|m| m.name == "covered").unwrap();
    assert_eq!(covered.image_url, "https://replicate.delivery/old.webp");

    // Two detail fetches: "covered" was skipped locally
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_retag_combines_registry_and_own_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models/acme/songsmith"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "owner": "acme",
            "name": "songsmith",
            "categories": ["music"]
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::open_in_memory().unwrap();
    let (model, _) = store
        .upsert_model("acme", "songsmith", &[], Some("Generates video jingles"), None)
        .unwrap();

    let (retagged, checked) = retag_missing(&store, &client_for(&server), Some("tok"))
        .await
        .unwrap();

    assert_eq!((retagged, checked), (1, 1));
    let tags = store.visible_tags(model.id).unwrap();
    assert!(tags.contains(&"music-generation".to_string()));
    // Own description mentions video
    assert!(tags.contains(&"video-generation".to_string()));
}

#[tokio::test]
async fn test_retag_works_without_token() {
    let server = MockServer::start().await;
    let store = CatalogStore::open_in_memory().unwrap();
    let (model, _) = store
        .upsert_model("acme", "mute", &[], Some("An image restoration tool"), None)
        .unwrap();

    let (retagged, checked) = retag_missing(&store, &client_for(&server), None)
        .await
        .unwrap();

    assert_eq!((retagged, checked), (1, 1));
    assert!(store
        .visible_tags(model.id)
        .unwrap()
        .contains(&"image-generation".to_string()));
    // No registry calls without a token
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_enrich_refreshes_description_and_tags() {
    let server = MockServer::start().await;
    let long_description = "A diffusion model that renders photoreal portraits from text \
                            prompts, tuned for studio lighting and consistent faces across \
                            a whole batch of renders, with negative prompt support and \
                            fast preview sampling for quick iteration on compositions.";
    Mock::given(method("GET"))
        .and(path("/v1/models/acme/portraitist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "owner": "acme",
            "name": "portraitist",
            "description": long_description,
            "visibility": "public"
        })))
        .mount(&server)
        .await;

    let store = CatalogStore::open_in_memory().unwrap();
    let (model, _) = store
        .upsert_model("acme", "portraitist", &[], Some(GENERIC_DESCRIPTION), None)
        .unwrap();

    let enriched = enrich(&store, &client_for(&server), Some("tok"))
        .await
        .unwrap();
    assert_eq!(enriched, 1);

    let refreshed = &store.all_models().unwrap()[0];
    assert!(refreshed.description.starts_with("A diffusion model"));
    assert!(refreshed.description.chars().count() <= 220);
    assert_ne!(refreshed.description, GENERIC_DESCRIPTION);

    let tags = store.visible_tags(model.id).unwrap();
    assert!(tags.contains(&"official".to_string()));
    // Keyword scan over the fresh description
    assert!(tags.contains(&"photoreal".to_string()));
    assert!(tags.contains(&"portrait".to_string()));
}

#[tokio::test]
async fn test_enrich_keeps_substantial_descriptions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models/acme/wordy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "owner": "acme",
            "name": "wordy",
            "description": "short upstream blurb"
        })))
        .mount(&server)
        .await;

    let kept = "A hand-written description that is comfortably long enough to keep as-is.";
    let store = CatalogStore::open_in_memory().unwrap();
    store.upsert_model("acme", "wordy", &[], Some(kept), None).unwrap();

    enrich(&store, &client_for(&server), Some("tok")).await.unwrap();

    assert_eq!(store.all_models().unwrap()[0].description, kept);
}
