//! End-to-end tests over the full router (base path, middleware, handlers)
//! against seeded in-memory repositories.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_bench::domain::{Category, Item};
use catalog_bench::handlers::api_router;
use catalog_bench::middleware;
use catalog_bench::repository::{CategoryRepository, ItemRepository, MemoryStore};
use catalog_bench::state::AppState;

const NO_CACHE: &str = "no-store, no-cache, must-revalidate, max-age=0";

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let elec = CategoryRepository::save(
        &store,
        Category {
            id: None,
            code: "ELEC".to_string(),
            name: "Electronics".to_string(),
        },
    )
    .await
    .unwrap();
    let books = CategoryRepository::save(
        &store,
        Category {
            id: None,
            code: "BOOK".to_string(),
            name: "Books".to_string(),
        },
    )
    .await
    .unwrap();
    for i in 0..5 {
        ItemRepository::save(
            &store,
            Item {
                id: None,
                sku: format!("E-{i}"),
                name: format!("Gadget {i}"),
                price: Decimal::new(1000 + i64::from(i) * 50, 2),
                stock: i + 1,
                description: None,
                category_id: elec.id.unwrap(),
            },
        )
        .await
        .unwrap();
    }
    ItemRepository::save(
        &store,
        Item {
            id: None,
            sku: "B-0".to_string(),
            name: "Novel".to_string(),
            price: Decimal::new(799, 2),
            stock: 3,
            description: Some("Paperback".to_string()),
            category_id: books.id.unwrap(),
        },
    )
    .await
    .unwrap();
    store
}

/// Full server composition minus the TCP listener: base path plus the
/// middleware stack.
fn app_over(store: MemoryStore, use_join_fetch: bool) -> Router {
    let state = AppState::new(Arc::new(store.clone()), Arc::new(store), use_join_fetch);
    middleware::apply(Router::new().nest("/api", api_router(state)))
}

async fn seeded_app(use_join_fetch: bool) -> Router {
    app_over(seeded_store().await, use_join_fetch)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: &Value,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, parsed)
}

#[tokio::test]
async fn categories_listing_is_a_plain_array_with_no_cache_headers() {
    let app = seeded_app(false).await;
    let (status, headers, body) = get(&app, "/api/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), NO_CACHE);
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");

    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0]["code"], "ELEC");
    assert_eq!(categories[1]["code"], "BOOK");
}

#[tokio::test]
async fn unknown_category_items_is_404_and_still_no_cache() {
    let app = seeded_app(false).await;
    let (status, headers, body) = get(&app, "/api/categories/999/items").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), NO_CACHE);
    assert_eq!(headers.get(header::PRAGMA).unwrap(), "no-cache");
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn category_items_are_identical_under_both_fetch_strategies() {
    // Same deterministic seed on both sides; only the strategy differs.
    let lazy = seeded_app(false).await;
    let joined = seeded_app(true).await;

    for uri in [
        "/api/categories/1/items",
        "/api/categories/1/items?page=0&size=1",
        "/api/categories/1/items?page=1&size=2",
        "/api/categories/1/items?page=4&size=1",
        "/api/items?categoryId=1&page=0&size=3",
    ] {
        let (status_a, _, body_a) = get(&lazy, uri).await;
        let (status_b, _, body_b) = get(&joined, uri).await;
        assert_eq!(status_a, StatusCode::OK);
        assert_eq!(status_b, StatusCode::OK);
        assert_eq!(body_a, body_b, "strategies diverged for {uri}");
    }
}

#[tokio::test]
async fn first_page_of_one_carries_denormalized_category_fields() {
    for use_join_fetch in [false, true] {
        let app = seeded_app(use_join_fetch).await;
        let (status, _, body) = get(&app, "/api/categories/1/items?page=0&size=1").await;
        assert_eq!(status, StatusCode::OK);

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["sku"], "E-0");
        assert_eq!(items[0]["categoryId"], 1);
        assert_eq!(items[0]["categoryCode"], "ELEC");
        assert_eq!(items[0]["categoryName"], "Electronics");
    }
}

#[tokio::test]
async fn flat_item_listing_filters_by_category() {
    let app = seeded_app(false).await;

    let (_, _, all) = get(&app, "/api/items").await;
    assert_eq!(all.as_array().unwrap().len(), 6);

    let (_, _, books) = get(&app, "/api/items?categoryId=2").await;
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["sku"], "B-0");

    // Unknown filter value on the flat listing is empty, not 404.
    let (status, _, empty) = get(&app, "/api/items?categoryId=999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(empty.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_item_by_id() {
    let app = seeded_app(false).await;

    let (status, _, body) = get(&app, "/api/items/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sku"], "E-0");

    let (status, _, body) = get(&app, "/api/items/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn create_item_returns_201_with_location() {
    let app = seeded_app(false).await;
    let payload = json!({
        "sku": "E-NEW",
        "name": "Charger",
        "price": 19.99,
        "stock": 4,
        "categoryId": 1
    });

    let (status, headers, body) = send_json(&app, "POST", "/api/items", &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), NO_CACHE);

    let id = body["id"].as_i64().unwrap();
    assert_eq!(
        headers.get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("/items/{id}")
    );
    assert_eq!(body["categoryCode"], "ELEC");
    assert_eq!(body["categoryName"], "Electronics");

    let (status, _, fetched) = get(&app, &format!("/api/items/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["sku"], "E-NEW");
}

#[tokio::test]
async fn create_item_with_unknown_category_is_400_without_side_effects() {
    let app = seeded_app(false).await;
    let (_, _, before) = get(&app, "/api/items?size=100").await;
    let count_before = before.as_array().unwrap().len();

    let payload = json!({
        "sku": "X-1",
        "name": "Orphan",
        "price": 1.00,
        "stock": 1,
        "categoryId": 999
    });
    let (status, headers, body) = send_json(&app, "POST", "/api/items", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), NO_CACHE);
    assert_eq!(body["code"], "validation_failed");

    let (_, _, after) = get(&app, "/api/items?size=100").await;
    assert_eq!(after.as_array().unwrap().len(), count_before);
}

#[tokio::test]
async fn update_item_is_existence_gated_and_path_id_wins() {
    let app = seeded_app(false).await;
    let payload = json!({
        "id": 42,
        "sku": "E-0",
        "name": "Gadget 0 v2",
        "price": 12.50,
        "stock": 8,
        "categoryId": 1
    });

    let (status, _, body) = send_json(&app, "PUT", "/api/items/999", &payload).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _, body) = send_json(&app, "PUT", "/api/items/1", &payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "Gadget 0 v2");
    assert_eq!(body["stock"], 8);
}

#[tokio::test]
async fn delete_item_is_existence_gated() {
    let app = seeded_app(false).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/items/999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/items/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        NO_CACHE
    );

    let (status, _, _) = get(&app, "/api/items/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn denormalized_fields_follow_a_category_rename_over_http() {
    let store = seeded_store().await;
    let app = app_over(store.clone(), true);

    // Rename the category out-of-band, as a concurrent writer would.
    CategoryRepository::save(
        &store,
        Category {
            id: Some(1),
            code: "ELEC".to_string(),
            name: "Consumer Electronics".to_string(),
        },
    )
    .await
    .unwrap();

    let (_, _, body) = get(&app, "/api/categories/1/items?size=100").await;
    for item in body.as_array().unwrap() {
        assert_eq!(item["categoryName"], "Consumer Electronics");
    }
}
