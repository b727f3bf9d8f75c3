//! Login flow and bearer-token pages against a mock thing API.

mod common;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use tower::ServiceExt;

use pointmap::HttpServer;

use common::{
    body_string, csrf_field, get, get_with_cookies, post_form, set_cookie_pair, start_mock_api,
    test_config,
};

fn thing_json() -> String {
    serde_json::json!([
        {
            "id": "5f2078d7-4d25-4a85-9aae-e9660052a0ac",
            "name": "Widget",
            "colour": "red",
            "created_at": "2023-05-17T10:30:00.000000+00:00",
            "updated_at": null,
        }
    ])
    .to_string()
}

async fn app_router<F>(thing_handler: F) -> axum::Router
where
    F: Fn(&str, &str) -> common::MockReply + Send + Sync + 'static,
{
    let point_api = start_mock_api(|_, _| (204, "application/geo+json", String::new())).await;
    let thing_api = start_mock_api(thing_handler).await;
    HttpServer::new(test_config(&point_api, &thing_api))
        .unwrap()
        .into_router()
}

#[tokio::test]
async fn test_login_sets_token_cookie_and_redirects_home() {
    let router = app_router(|method, target| {
        assert_eq!(method, "GET");
        assert_eq!(target, "/v1/auth/token");
        (200, "application/json", r#"{"token":"tok123"}"#.to_string())
    })
    .await;

    let response = router.clone().oneshot(get("/auth/login")).await.unwrap();
    let cookie = set_cookie_pair(&response, "csrf_token").unwrap();
    let token = csrf_field(&body_string(response).await).unwrap();

    let body = format!(
        "email_address=a%40example.com&password=correct-horse&csrf_token={}",
        token
    );
    let response = router
        .oneshot(post_form("/auth/login", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/");
    assert_eq!(
        set_cookie_pair(&response, "token").unwrap(),
        "token=tok123"
    );
}

#[tokio::test]
async fn test_login_form_errors_rerender_inline() {
    let router = app_router(|_, _| (500, "application/json", String::new())).await;

    let response = router.clone().oneshot(get("/auth/login")).await.unwrap();
    let cookie = set_cookie_pair(&response, "csrf_token").unwrap();
    let token = csrf_field(&body_string(response).await).unwrap();

    let body = format!(
        "email_address=not-an-email&password=short&csrf_token={}",
        token
    );
    let response = router
        .oneshot(post_form("/auth/login", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Enter an email address in the correct format"));
    assert!(body.contains("Password must be between 8 and 72 characters"));
    // What was typed stays; the password never comes back.
    assert!(body.contains("value=\"not-an-email\""));
    assert!(!body.contains("short"));
}

#[tokio::test]
async fn test_bad_credentials_surface_as_401_page() {
    let router = app_router(|_, _| (401, "application/json", String::new())).await;

    let response = router.clone().oneshot(get("/auth/login")).await.unwrap();
    let cookie = set_cookie_pair(&response, "csrf_token").unwrap();
    let token = csrf_field(&body_string(response).await).unwrap();

    let body = format!(
        "email_address=a%40example.com&password=wrong-horse-battery&csrf_token={}",
        token
    );
    let response = router
        .oneshot(post_form("/auth/login", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_things_list_with_token() {
    let router = app_router(|method, target| {
        assert_eq!(method, "GET");
        assert_eq!(target, "/v1/things");
        (200, "application/json", thing_json())
    })
    .await;

    let response = router
        .oneshot(get_with_cookies("/things", "token=tok123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Widget"));
    assert!(body.contains("red"));
}

#[tokio::test]
async fn test_things_list_passes_filters_upstream() {
    let router = app_router(|_, target| {
        assert_eq!(target, "/v1/things?sort=colour&colour=red");
        (200, "application/json", thing_json())
    })
    .await;

    let response = router
        .oneshot(get_with_cookies(
            "/things?sort=colour&colour=red",
            "token=tok123",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_users_list_with_token() {
    let router = app_router(|_, target| {
        assert_eq!(target, "/v1/users");
        (
            200,
            "application/json",
            serde_json::json!([
                {
                    "id": "0c7e38a1-24ad-4f9d-a1cd-c9c5a6c2a0de",
                    "email_address": "a@example.com",
                    "created_at": "2023-05-17T10:30:00.000000+00:00",
                    "updated_at": null,
                }
            ])
            .to_string(),
        )
    })
    .await;

    let response = router
        .oneshot(get_with_cookies("/users", "token=tok123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("a@example.com"));
}

#[tokio::test]
async fn test_thing_csv_download() {
    let router = app_router(|_, target| {
        assert_eq!(target, "/v1/things");
        (200, "text/csv", "id,name,colour\r\n".to_string())
    })
    .await;

    let response = router
        .oneshot(get_with_cookies("/things/download", "token=tok123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(axum::http::header::CONTENT_DISPOSITION)
            .unwrap(),
        "attachment; filename=\"things.csv\""
    );
}
