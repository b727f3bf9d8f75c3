//! Map page integration tests: tile settings, popups, viewport fit.

mod common;

use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use tower::ServiceExt;

use pointmap::HttpServer;

use common::{body_string, get, sample_collection, start_mock_api, test_config};

async fn map_page_with(points_reply: common::MockReply) -> (StatusCode, String) {
    let point_api = start_mock_api(move |method, target| {
        assert_eq!(method, "GET");
        assert_eq!(target, "/points");
        points_reply.clone()
    })
    .await;
    let thing_api = start_mock_api(|_, _| (500, "application/json", String::new())).await;

    let router = HttpServer::new(test_config(&point_api, &thing_api))
        .unwrap()
        .into_router();

    let response = router.oneshot(get("/")).await.unwrap();
    let status = response.status();
    let body = body_string(response).await;
    (status, body)
}

#[tokio::test]
async fn test_map_page_carries_tile_layer_settings() {
    let (status, body) =
        map_page_with((200, "application/geo+json", sample_collection())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("id=\"mapid\""));
    assert!(body.contains("\"https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png\""));
    assert!(body.contains("maxZoom: 19,"));
    assert!(body.contains("OpenStreetMap contributors"));
}

#[tokio::test]
async fn test_popup_bound_only_to_named_features() {
    let (_, body) = map_page_with((200, "application/geo+json", sample_collection())).await;

    // Exactly one of the two features carries a name, so exactly one popup.
    assert!(body.contains("\"popup\":\"Greenwich Park\""));
    assert_eq!(body.matches("\"popup\":").count(), 1);
}

#[tokio::test]
async fn test_viewport_fits_data_bounds() {
    let (_, body) = map_page_with((200, "application/geo+json", sample_collection())).await;

    assert!(body.contains("map.fitBounds([[51.5,-0.1],[51.6,0.2]]);"));
    assert!(!body.contains("map.setView("));
}

#[tokio::test]
async fn test_empty_collection_falls_back_to_world_view() {
    let empty = serde_json::json!({"type": "FeatureCollection", "features": []}).to_string();
    let (status, body) = map_page_with((200, "application/geo+json", empty)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("map.setView([0, 0], 2);"));
    assert!(!body.contains("map.fitBounds("));
}

#[tokio::test]
async fn test_upstream_204_renders_empty_map() {
    let (status, body) = map_page_with((204, "application/geo+json", String::new())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("0 points plotted."));
}

#[tokio::test]
async fn test_map_page_is_html() {
    let point_api = start_mock_api(|_, _| (204, "application/geo+json", String::new())).await;
    let thing_api = start_mock_api(|_, _| (500, "application/json", String::new())).await;
    let router = HttpServer::new(test_config(&point_api, &thing_api))
        .unwrap()
        .into_router();

    let response = router.oneshot(get("/")).await.unwrap();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));
}
