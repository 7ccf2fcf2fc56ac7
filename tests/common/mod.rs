#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rand::{rngs::StdRng, SeedableRng};
use tower::ServiceExt;

use spotfinder::database;
use spotfinder::services::place_source::{MockSource, PlaceSource};
use spotfinder::services::places_service::{PlacesService, PlacesSettings};
use spotfinder::web::session::SessionKeys;
use spotfinder::{build_router, AppState};

pub const SECRET: &str = "test-secret-test-secret-test-secret";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of the session Set-Cookie header, if any.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .and_then(|v| v.split(';').next())
            .map(|s| s.to_string())
    }
}

pub async fn test_app() -> Router {
    test_app_with_source(Arc::new(MockSource::default())).await
}

pub async fn test_app_with_source(source: Arc<dyn PlaceSource>) -> Router {
    let pool = database::connect_in_memory().await.unwrap();
    let places = PlacesService::with_rng(source, PlacesSettings::default(), StdRng::seed_from_u64(3));
    let sessions = SessionKeys::new(SECRET, Duration::from_secs(3600));
    build_router(AppState::new(pool, Arc::new(places), sessions))
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

pub fn post_json(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Signs a user up, logs in and returns the session cookie.
pub async fn login_as(app: &Router, username: &str) -> String {
    let form = format!("username={}&password=pw-{}", username, username);
    let signup = send(app, post_form("/signup", &form)).await;
    assert_eq!(signup.status, StatusCode::SEE_OTHER);

    let login = send(app, post_form("/login", &form)).await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    login.session_cookie().expect("login sets a session cookie")
}
