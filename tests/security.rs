//! Security middleware: response headers, rate limiting, CSRF.

mod common;

use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use tower::ServiceExt;

use pointmap::config::AppConfig;
use pointmap::HttpServer;

use common::{
    body_string, csrf_field, get, post_form, set_cookie_pair, start_mock_api, test_config,
};

async fn quiet_config() -> AppConfig {
    let point_api = start_mock_api(|_, _| (204, "application/geo+json", String::new())).await;
    let thing_api = start_mock_api(|_, _| (500, "application/json", String::new())).await;
    test_config(&point_api, &thing_api)
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let router = HttpServer::new(quiet_config().await).unwrap().into_router();
    let response = router.oneshot(get("/healthz")).await.unwrap();

    let headers = response.headers();
    let csp = headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.starts_with("default-src 'self'"));
    assert!(csp.contains("'nonce-"));
    assert!(csp.contains("img-src 'self' data: https://*.tile.openstreetmap.org"));

    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(
        headers.get("referrer-policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
    assert!(headers.get("x-request-id").is_some());

    // Secure-cookie mode is off in tests, so no HSTS.
    assert!(headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_hsts_follows_cookie_secure() {
    let mut config = quiet_config().await;
    config.security.cookie_secure = true;
    let router = HttpServer::new(config).unwrap().into_router();

    let response = router.oneshot(get("/healthz")).await.unwrap();
    assert!(response
        .headers()
        .get("strict-transport-security")
        .is_some());
}

#[tokio::test]
async fn test_rate_limit_kicks_in_after_burst() {
    let mut config = quiet_config().await;
    config.rate_limit.enabled = true;
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst = 2;
    let router = HttpServer::new(config).unwrap().into_router();

    for _ in 0..2 {
        let response = router.clone().oneshot(get("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = router.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_string(response).await;
    assert!(body.contains("Too many requests"));
}

#[tokio::test]
async fn test_csrf_round_trip_allows_submission() {
    let point_api = start_mock_api(|method, target| match (method, target) {
        ("POST", "/points") => (
            201,
            "application/geo+json",
            serde_json::json!({
                "type": "Feature",
                "id": "7e62ecd5-6bf1-4d65-a09a-5dc0089a9b5d",
                "properties": {
                    "name": "Kew Gardens",
                    "created_at": "2023-05-17T10:30:00.000000+00:00",
                    "updated_at": null,
                },
                "geometry": { "type": "Point", "coordinates": [-0.295, 51.478] },
            })
            .to_string(),
        ),
        _ => (500, "application/geo+json", String::new()),
    })
    .await;
    let thing_api = start_mock_api(|_, _| (500, "application/json", String::new())).await;
    let router = HttpServer::new(test_config(&point_api, &thing_api))
        .unwrap()
        .into_router();

    // Fetch the form to collect the token cookie and the hidden field.
    let response = router.clone().oneshot(get("/points/new")).await.unwrap();
    let cookie = set_cookie_pair(&response, "csrf_token").unwrap();
    let token = csrf_field(&body_string(response).await).unwrap();

    let body = format!(
        "name=Kew+Gardens&latitude=51.478&longitude=-0.295&csrf_token={}",
        token
    );
    let response = router
        .oneshot(post_form("/points/new", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/points");
    // The confirmation rides a flash cookie to the next page.
    assert!(set_cookie_pair(&response, "flash").is_some());
}

#[tokio::test]
async fn test_post_without_csrf_token_redirects_back() {
    let router = HttpServer::new(quiet_config().await).unwrap().into_router();

    let response = router
        .oneshot(post_form(
            "/points/new",
            None,
            "name=X&latitude=1&longitude=2",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/points/new");
    assert!(set_cookie_pair(&response, "flash").is_some());
}

#[tokio::test]
async fn test_mismatched_csrf_token_redirects_back() {
    let router = HttpServer::new(quiet_config().await).unwrap().into_router();

    // A valid cookie with the wrong field value must not pass.
    let response = router.clone().oneshot(get("/points/new")).await.unwrap();
    let cookie = set_cookie_pair(&response, "csrf_token").unwrap();

    let response = router
        .oneshot(post_form(
            "/points/new",
            Some(&cookie),
            "name=X&latitude=1&longitude=2&csrf_token=forged",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/points/new");
}

#[tokio::test]
async fn test_csrf_cookie_issued_on_first_visit() {
    let router = HttpServer::new(quiet_config().await).unwrap().into_router();
    let response = router.oneshot(get("/points/new")).await.unwrap();

    let cookie_header = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("csrf_token="))
        .unwrap();
    assert!(cookie_header.contains("HttpOnly"));
    assert!(cookie_header.contains("SameSite=Lax"));
}
