mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{call, SECRET};
use serde_json::json;
use skyway_api::{app, identity, AppState};
use skyway_core::InMemoryPublisher;
use skyway_identity::{IdentityDependencies, InMemoryAuthRepository, InMemoryUserRepository, TokenSettings};
use std::sync::Arc;

fn identity_app() -> (Router, Arc<InMemoryPublisher>) {
    let publisher = Arc::new(InMemoryPublisher::new());
    let deps = IdentityDependencies {
        users: Arc::new(InMemoryUserRepository::new()),
        tokens: Arc::new(InMemoryAuthRepository::new()),
        publisher: publisher.clone(),
        settings: TokenSettings {
            secret: SECRET.to_string(),
            access_expiration_minutes: 30,
            refresh_expiration_days: 30,
        },
    };
    let state = AppState::new(identity::build_mediator(&deps).unwrap(), SECRET);
    (app(state.clone(), identity::routes(&state)), publisher)
}

async fn register_and_login(app: &Router) -> serde_json::Value {
    let (status, _) = call(
        app,
        Method::POST,
        "/api/v1/user/create",
        None,
        Some(json!({
            "email": "ada@skyway.dev",
            "password": "cockpit42",
            "name": "Ada Lovelace",
            "role": "user",
            "passportNumber": "P1234567"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, auth) = call(
        app,
        Method::POST,
        "/api/v1/identity/login",
        None,
        Some(json!({ "email": "ada@skyway.dev", "password": "cockpit42" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    auth
}

#[tokio::test]
async fn test_register_login_and_read_profile() {
    let (app, publisher) = identity_app();
    let auth = register_and_login(&app).await;
    let access = auth["access"]["token"].as_str().unwrap();

    let (status, page) = call(&app, Method::GET, "/api/v1/user/get?searchTerm=ada", Some(access), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["email"], "ada@skyway.dev");
    assert!(page["items"][0].get("passwordHash").is_none());
    assert_eq!(publisher.published_on("identity.user_created").len(), 1);
}

#[tokio::test]
async fn test_bad_credentials_are_401() {
    let (app, _) = identity_app();
    register_and_login(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/identity/login",
        None,
        Some(json!({ "email": "ada@skyway.dev", "password": "wrong-pass1" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Incorrect email or password");
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_replay() {
    let (app, _) = identity_app();
    let auth = register_and_login(&app).await;
    let refresh = auth["refresh"]["token"].clone();

    let (status, rotated) = call(
        &app,
        Method::POST,
        "/api/v1/identity/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(rotated["refresh"]["token"], refresh);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/identity/refresh-token",
        None,
        Some(json!({ "refreshToken": refresh })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please authenticate");
}

#[tokio::test]
async fn test_logout_revokes_access_token_record() {
    let (app, _) = identity_app();
    let auth = register_and_login(&app).await;
    let access = auth["access"]["token"].as_str().unwrap();

    let (status, body) = call(&app, Method::POST, "/api/v1/identity/logout", Some(access), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = call(&app, Method::POST, "/api/v1/identity/logout", Some(access), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let (app, _) = identity_app();
    let auth = register_and_login(&app).await;
    let access = auth["access"]["token"].as_str().unwrap();

    let (status, updated) = call(
        &app,
        Method::PUT,
        "/api/v1/user/update/1",
        Some(access),
        Some(json!({ "name": "Ada King" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ada King");

    let (status, _) = call(&app, Method::DELETE, "/api/v1/user/delete?id=1", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, "/api/v1/user/get-by-id?id=1", Some(access), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_registration_is_409() {
    let (app, _) = identity_app();
    register_and_login(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/user/create",
        None,
        Some(json!({
            "email": "ada@skyway.dev",
            "password": "another1pass",
            "name": "Someone Else",
            "role": "user",
            "passportNumber": "P7654321"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already taken");
}
