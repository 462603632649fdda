#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use rock_api::config::AppConfig;
use rock_api::database::MemoryStore;
use rock_api::AppState;

/// Router over a fresh in-memory store with the standard rock types
pub fn test_app() -> Router {
    test_app_with(AppConfig::development())
}

pub fn test_app_with(mut config: AppConfig) -> Router {
    config.api.enable_request_logging = false;
    rock_api::app(AppState::new(Arc::new(MemoryStore::new()), config))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let (status, _, value) = dispatch(app, request).await;
    (status, value)
}

/// Run a hand-built request, keeping the response headers
pub async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|e| panic!("non-JSON body ({}): {}", e, String::from_utf8_lossy(&bytes)))
    };
    (status, headers, value)
}

pub fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

/// Register `username` (first name `first_name`) and return its token
pub async fn register(app: &Router, username: &str, first_name: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "username": username,
            "password": format!("{}-password", username),
            "first_name": first_name,
            "last_name": "Stone",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_rock(app: &Router, token: &str, name: &str, type_id: i64, weight: f64) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/rocks",
        Some(token),
        Some(json!({ "type_id": type_id, "weight": weight, "name": name })),
    )
    .await
}

pub fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}
