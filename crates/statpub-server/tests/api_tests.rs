//! Router tests that never reach the database
//!
//! Requests here either fail validation or are served from the response
//! cache, so the pool behind the router is never connected.

mod common;

use axum::http::StatusCode;
use common::{enabled_cache, get, lazy_app, send};
use statpub_server::cache::{ContentCache, DATA_SET_FILES_NAMESPACE, PUBLICATIONS_NAMESPACE};
use statpub_server::features::data_set_files::ListDataSetFilesQuery;
use statpub_server::features::data_set_files::ListDataSetFilesResponse;
use statpub_server::features::shared::PaginationMetadata;

async fn assert_validation_error(uri: &str, message_fragment: &str) {
    let (status, body) = get(lazy_app(enabled_cache()), uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let message = body["error"]["message"].as_str().unwrap_or_default();
    assert!(
        message.contains(message_fragment),
        "{uri}: expected '{message_fragment}' in '{message}'"
    );
}

#[tokio::test]
async fn test_root_describes_service() {
    let (status, body) = get(lazy_app(enabled_cache()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_object());
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let (status, body) = get(lazy_app(enabled_cache()), "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = get(lazy_app(enabled_cache()), "/api/v1/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Data set file validation
// ============================================================================

#[tokio::test]
async fn test_data_set_files_rejects_short_search_term() {
    assert_validation_error("/api/v1/data-set-files?search_term=ab", "at least 3").await;
}

#[tokio::test]
async fn test_data_set_files_rejects_relevance_without_search() {
    assert_validation_error("/api/v1/data-set-files?sort=relevance", "requires a search term").await;
}

#[tokio::test]
async fn test_data_set_files_rejects_natural_without_release() {
    assert_validation_error("/api/v1/data-set-files?sort=natural", "requires a release_id").await;
}

#[tokio::test]
async fn test_data_set_files_rejects_release_without_publication() {
    assert_validation_error(
        "/api/v1/data-set-files?release_id=8c3f7a52-1b8e-4d2b-9c51-6f0a2e7d4b10",
        "requires a publication_id",
    )
    .await;
}

#[tokio::test]
async fn test_data_set_files_rejects_oversized_page() {
    let (status, body) = get(lazy_app(enabled_cache()), "/api/v1/data-set-files?per_page=500").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = get(lazy_app(enabled_cache()), "/api/v1/data-set-files?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_set_files_rejects_unknown_geographic_level() {
    assert_validation_error("/api/v1/data-set-files?geographic_level=GALAXY", "GALAXY").await;
}

#[tokio::test]
async fn test_data_set_file_path_must_be_uuid() {
    let (status, body) = get(lazy_app(enabled_cache()), "/api/v1/data-set-files/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unparseable_query_values_are_enveloped() {
    for uri in [
        "/api/v1/data-set-files?sort=bogus",
        "/api/v1/data-set-files?theme_id=not-a-uuid",
        "/api/v1/data-set-files?page=abc",
        "/api/v1/publications?sort=nope",
        "/api/v1/publications/pupil-absence/releases?page=abc",
    ] {
        let (status, body) = get(lazy_app(enabled_cache()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}: {body}");
        assert_eq!(body["success"], false, "{uri}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
    }
}

// ============================================================================
// Publication and release validation
// ============================================================================

#[tokio::test]
async fn test_publications_reject_unknown_release_type() {
    assert_validation_error("/api/v1/publications?release_type=national_statistics", "national_statistics")
        .await;
}

#[tokio::test]
async fn test_publications_reject_relevance_without_search() {
    let (status, _) = get(lazy_app(enabled_cache()), "/api/v1/publications?sort=relevance").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_publication_slug_is_not_found() {
    let (status, body) = get(lazy_app(enabled_cache()), "/api/v1/publications/Pupil_Absence").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = get(lazy_app(enabled_cache()), "/api/v1/publications/Pupil_Absence/title").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_release_routes_check_slugs_and_paging() {
    let (status, _) = get(lazy_app(enabled_cache()), "/api/v1/publications/BAD/releases").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        get(lazy_app(enabled_cache()), "/api/v1/publications/pupil-absence/releases?per_page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = get(lazy_app(enabled_cache()), "/api/v1/publications/BAD/releases/latest").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) =
        get(lazy_app(enabled_cache()), "/api/v1/publications/pupil-absence/releases/Not_A_Release").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Cached responses
// ============================================================================

#[tokio::test]
async fn test_data_set_listing_is_served_from_cache() {
    let cache = enabled_cache();
    let resolved = ListDataSetFilesQuery::default().resolve().unwrap();
    let key = ContentCache::key(DATA_SET_FILES_NAMESPACE, &resolved).unwrap();
    cache.insert(
        key,
        &ListDataSetFilesResponse::new(Vec::new(), PaginationMetadata::new(1, 20, 0)),
    );

    let (status, body) = get(lazy_app(cache.clone()), "/api/v1/data-set-files").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], serde_json::json!([]));
    assert_eq!(body["meta"]["pagination"]["total"], 0);
    assert_eq!(cache.stats().hits, 1);

    // Spelling out the defaults resolves to the same entry
    let (status, _) = get(
        lazy_app(cache.clone()),
        "/api/v1/data-set-files?sort=title&sort_direction=asc&page=1&per_page=20&latest_only=true",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cache.stats().hits, 2);
}

#[tokio::test]
async fn test_disabled_cache_goes_to_database() {
    let cache = ContentCache::disabled();
    let resolved = ListDataSetFilesQuery::default().resolve().unwrap();
    cache.insert(
        ContentCache::key(DATA_SET_FILES_NAMESPACE, &resolved).unwrap(),
        &ListDataSetFilesResponse::new(Vec::new(), PaginationMetadata::new(1, 20, 0)),
    );

    let (status, body) = get(lazy_app(cache), "/api/v1/data-set-files").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

// ============================================================================
// Cache administration
// ============================================================================

#[tokio::test]
async fn test_cache_stats() {
    let (status, body) = get(lazy_app(enabled_cache()), "/api/v1/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["enabled"], true);
    assert_eq!(body["data"]["total_entries"], 0);
    assert_eq!(body["data"]["schedule"], "half_hourly");
}

#[tokio::test]
async fn test_clear_cache_namespace() {
    let cache = enabled_cache();
    cache.insert(ContentCache::key(DATA_SET_FILES_NAMESPACE, "a").unwrap(), &1);
    cache.insert(ContentCache::key(PUBLICATIONS_NAMESPACE, "b").unwrap(), &2);

    let (status, body) = send(
        lazy_app(cache.clone()),
        "DELETE",
        "/api/v1/cache?namespace=data-set-files",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["namespace"], "data-set-files");
    assert_eq!(body["data"]["removed"], 1);
    assert_eq!(cache.stats().total_entries, 1);

    let (status, body) = send(lazy_app(cache.clone()), "DELETE", "/api/v1/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 1);
    assert_eq!(cache.stats().total_entries, 0);
}

#[tokio::test]
async fn test_clear_cache_rejects_unknown_namespace() {
    let (status, body) = send(
        lazy_app(enabled_cache()),
        "DELETE",
        "/api/v1/cache?namespace=sessions",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("sessions"));
}
