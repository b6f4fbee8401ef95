mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{access_token, call, SECRET};
use serde_json::json;
use skyway_api::{app, flight, AppState};
use skyway_core::InMemoryPublisher;
use skyway_flight::{FlightDependencies, InMemoryFlightRepository};
use std::sync::Arc;

fn flight_app() -> (Router, Arc<InMemoryPublisher>) {
    let publisher = Arc::new(InMemoryPublisher::new());
    let deps = FlightDependencies {
        repository: Arc::new(InMemoryFlightRepository::new()),
        publisher: publisher.clone(),
    };
    let state = AppState::new(flight::build_mediator(&deps).unwrap(), SECRET);
    (app(state.clone(), flight::routes(&state)), publisher)
}

fn new_flight(number: &str) -> serde_json::Value {
    json!({
        "flightNumber": number,
        "price": 310.5,
        "flightStatus": "FLYING",
        "flightDate": "2026-12-01T09:00:00Z",
        "departureDate": "2026-12-01T09:00:00Z",
        "departureAirportId": 1,
        "aircraftId": 3,
        "arriveDate": "2026-12-01T11:10:00Z",
        "arriveAirportId": 2,
        "durationMinutes": 130
    })
}

#[tokio::test]
async fn test_create_then_fetch_flight() {
    let (app, publisher) = flight_app();
    let token = access_token(1);

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/v1/flight/create",
        Some(&token),
        Some(new_flight("SK501")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["flightNumber"], "SK501");
    assert_eq!(publisher.published_on("flight.created").len(), 1);

    let uri = format!("/api/v1/flight/get-by-id?id={}", created["id"]);
    let (status, fetched) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_flight_is_409() {
    let (app, publisher) = flight_app();
    let token = access_token(1);
    call(&app, Method::POST, "/api/v1/flight/create", Some(&token), Some(new_flight("SK502"))).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/flight/create",
        Some(&token),
        Some(new_flight("SK502")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Flight already taken");
    assert_eq!(publisher.published().len(), 1);
}

#[tokio::test]
async fn test_invalid_body_is_400_with_violations() {
    let (app, _) = flight_app();

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/flight/create",
        Some(&access_token(1)),
        Some(json!({ "price": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_failed");
    let fields: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"flightNumber"));
    assert!(fields.contains(&"price"));
}

#[tokio::test]
async fn test_missing_flight_is_404() {
    let (app, _) = flight_app();

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/v1/flight/get-by-id?id=99",
        Some(&access_token(1)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Flight not found");
}

#[tokio::test]
async fn test_listing_uses_query_paging() {
    let (app, _) = flight_app();
    let token = access_token(1);
    for n in 0..3 {
        call(
            &app,
            Method::POST,
            "/api/v1/flight/create",
            Some(&token),
            Some(new_flight(&format!("SK60{n}"))),
        )
        .await;
    }

    let (status, page) = call(
        &app,
        Method::GET,
        "/api/v1/flight/get-all?page=1&pageSize=2&orderBy=flightNumber&order=DESC",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"][0]["flightNumber"], "SK602");
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_requests_without_access_token_are_401() {
    let (app, _) = flight_app();

    let (status, _) = call(&app, Method::GET, "/api/v1/flight/get-all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/v1/flight/get-all",
        Some("not-a-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}
