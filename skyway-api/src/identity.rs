use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use skyway_core::{Mediator, MediatorBuilder, RegistryError};
use skyway_identity::{
    AuthDto, CreateUser, DeleteUserById, GetUserById, GetUsers, IdentityDependencies, Login, Logout,
    RefreshToken, UpdateUser, UserDto,
};
use skyway_shared::{PageParams, PagedResult};

use crate::{
    error::AppError,
    middleware::auth::{access_auth_middleware, BearerToken},
    state::AppState,
};

pub fn build_mediator(deps: &IdentityDependencies) -> Result<Mediator, RegistryError> {
    let mut builder = MediatorBuilder::new();
    skyway_identity::register_handlers(&mut builder, deps)?;
    Ok(builder.build())
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/api/v1/user/get", get(get_users))
        .route("/api/v1/user/get-by-id", get(get_user_by_id))
        .route("/api/v1/user/update/{id}", put(update_user))
        .route("/api/v1/user/delete", delete(delete_user))
        .route("/api/v1/identity/logout", post(logout))
        .route_layer(from_fn_with_state(state.clone(), access_auth_middleware));

    Router::new()
        .route("/api/v1/user/create", post(create_user))
        .route("/api/v1/identity/login", post(login))
        .route("/api/v1/identity/refresh-token", post(refresh_token))
        .merge(protected)
}

// ============================================================================
// Users
// ============================================================================

async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUser>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    let user = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PagedResult<UserDto>>, AppError> {
    Ok(Json(state.mediator.send(GetUsers { params }).await?))
}

async fn get_user_by_id(
    State(state): State<AppState>,
    Query(request): Query<GetUserById>,
) -> Result<Json<UserDto>, AppError> {
    Ok(Json(state.mediator.send(request).await?))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUser>,
) -> Result<Json<UserDto>, AppError> {
    let request = UpdateUser {
        id: Some(id),
        ..request
    };
    Ok(Json(state.mediator.send(request).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Query(request): Query<DeleteUserById>,
) -> Result<Json<UserDto>, AppError> {
    Ok(Json(state.mediator.send(request).await?))
}

// ============================================================================
// Auth
// ============================================================================

async fn login(
    State(state): State<AppState>,
    Json(request): Json<Login>,
) -> Result<Json<AuthDto>, AppError> {
    Ok(Json(state.mediator.send(request).await?))
}

async fn logout(
    State(state): State<AppState>,
    Extension(BearerToken(token)): Extension<BearerToken>,
) -> Result<StatusCode, AppError> {
    state
        .mediator
        .send(Logout {
            access_token: Some(token),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshToken>,
) -> Result<Json<AuthDto>, AppError> {
    Ok(Json(state.mediator.send(request).await?))
}
