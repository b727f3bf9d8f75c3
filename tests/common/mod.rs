//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::Request;
use axum::response::Response;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pointmap::config::AppConfig;

/// A canned upstream reply: status, content type, body.
pub type MockReply = (u16, &'static str, String);

/// Start a programmable mock upstream that routes on (method, path+query).
///
/// Returns the base URL to point the service at.
pub async fn start_mock_api<F>(handler: F) -> String
where
    F: Fn(&str, &str) -> MockReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handler = Arc::new(handler);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let Some((method, target)) = read_request(&mut socket).await else {
                            return;
                        };
                        let (status, content_type, body) = handler(&method, &target);
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            204 => "204 No Content",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            content_type,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    format!("http://{}", addr)
}

/// Read the request head (and any declared body), returning method and target.
async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<(String, String)> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
    };

    // Drain the body so the client finishes writing before we close.
    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    while buffer.len() < header_end + 4 + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();
    Some((method, target))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Configuration pointing at mock upstreams, with testing-friendly security.
pub fn test_config(point_api: &str, thing_api: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.upstream.point_api_url = point_api.to_string();
    config.upstream.thing_api_url = thing_api.to_string();
    config.upstream.timeout_secs = 2;
    config.security.secret_key = "integration-test-secret".to_string();
    config.security.cookie_secure = false;
    config.rate_limit.enabled = false;
    config
}

/// Client address attached to test requests (rate limiting keys on it).
pub const CLIENT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 40000);

fn with_connect_info(mut request: Request<Body>) -> Request<Body> {
    let (ip, port) = CLIENT_ADDR;
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((ip, port))));
    request
}

/// Build a GET request.
pub fn get(path: &str) -> Request<Body> {
    with_connect_info(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
}

/// Build a GET request with a Cookie header.
pub fn get_with_cookies(path: &str, cookies: &str) -> Request<Body> {
    with_connect_info(
        Request::builder()
            .uri(path)
            .header(COOKIE, cookies)
            .body(Body::empty())
            .unwrap(),
    )
}

/// Build a form POST request.
pub fn post_form(path: &str, cookies: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(COOKIE, cookies);
    }
    with_connect_info(builder.body(Body::from(body.to_string())).unwrap())
}

/// Collect the response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// First Set-Cookie pair (name=value) whose name matches.
pub fn set_cookie_pair(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .map(|v| v.split(';').next().unwrap().to_string())
}

/// Pull the hidden CSRF field value out of a rendered form.
pub fn csrf_field(body: &str) -> Option<String> {
    let marker = "name=\"csrf_token\" value=\"";
    let start = body.find(marker)? + marker.len();
    let end = body[start..].find('"')? + start;
    Some(body[start..end].to_string())
}

/// A small feature collection: one named point, one unnamed.
pub fn sample_collection() -> String {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "7e62ecd5-6bf1-4d65-a09a-5dc0089a9b5d",
                "properties": {
                    "name": "Greenwich Park",
                    "created_at": "2023-05-17T10:30:00.000000+00:00",
                    "updated_at": null,
                },
                "geometry": { "type": "Point", "coordinates": [-0.1, 51.5] },
            },
            {
                "type": "Feature",
                "id": "9b7b35b5-23c2-4ad4-bd9f-7ee8e8a42eb6",
                "properties": {
                    "created_at": "2023-05-18T09:00:00.000000+00:00",
                    "updated_at": null,
                },
                "geometry": { "type": "Point", "coordinates": [0.2, 51.6] },
            },
        ],
    })
    .to_string()
}
