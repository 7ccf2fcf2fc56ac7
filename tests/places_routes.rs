mod common;

use axum::http::StatusCode;

use common::{get, send, test_app};

#[tokio::test]
async fn work_mood_returns_ranked_cafes() {
    let app = test_app().await;

    let resp = send(&app, get("/get_places?lat=40.7128&lng=-74.0060&mood=work", None)).await;
    assert_eq!(resp.status, StatusCode::OK);

    let places = resp.json();
    let places = places.as_array().unwrap();
    assert_eq!(places.len(), 10);

    let mut last = 0.0;
    for place in places {
        for field in ["id", "name", "type", "lat", "lon", "distance", "rating"] {
            assert!(place.get(field).is_some(), "missing {field}: {place}");
        }
        assert_eq!(place["type"], "cafe");

        let distance = place["distance"].as_f64().unwrap();
        assert!(distance >= last);
        last = distance;

        let rating = place["rating"].as_f64().unwrap();
        assert!((3.9 - 1e-9..=4.5 + 1e-9).contains(&rating), "rating {rating}");
    }
}

#[tokio::test]
async fn missing_mood_uses_default_category() {
    let app = test_app().await;

    let resp = send(&app, get("/get_places?lat=48.8566&lng=2.3522", None)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let places = resp.json();
    assert!(places
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["type"] == "restaurant"));
}

#[tokio::test]
async fn repeated_requests_are_served_from_cache() {
    let app = test_app().await;
    let uri = "/get_places?lat=51.5074&lng=-0.1278&mood=date";

    let first = send(&app, get(uri, None)).await;
    let second = send(&app, get(uri, None)).await;

    assert_eq!(first.status, StatusCode::OK);
    // Ratings are random per computation; identical bodies mean no recomputation.
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn bad_coordinates_are_client_errors() {
    let app = test_app().await;

    for uri in [
        "/get_places?lng=-74.0060&mood=work",
        "/get_places?lat=40.7128&mood=work",
        "/get_places?lat=abc&lng=-74.0060&mood=work",
        "/get_places?lat=40.7128&lng=&mood=work",
        "/get_places?lat=95&lng=-74.0060&mood=work",
        "/get_places?lat=40.7128&lng=200&mood=work",
    ] {
        let resp = send(&app, get(uri, None)).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(resp.json().get("error").is_some(), "{uri}");
    }
}
