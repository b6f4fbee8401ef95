use axum::{
    extract::{Query, State},
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use skyway_core::{Mediator, MediatorBuilder, RegistryError};
use skyway_passenger::{GetPassengerById, GetPassengers, PassengerDependencies, PassengerDto};
use skyway_shared::{PageParams, PagedResult};

use crate::{error::AppError, middleware::auth::access_auth_middleware, state::AppState};

pub fn build_mediator(deps: &PassengerDependencies) -> Result<Mediator, RegistryError> {
    let mut builder = MediatorBuilder::new();
    skyway_passenger::register_handlers(&mut builder, deps)?;
    Ok(builder.build())
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/passenger/get-all", get(get_passengers))
        .route("/api/v1/passenger/get-by-id", get(get_passenger_by_id))
        .route_layer(from_fn_with_state(state.clone(), access_auth_middleware))
}

async fn get_passengers(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PagedResult<PassengerDto>>, AppError> {
    Ok(Json(state.mediator.send(GetPassengers { params }).await?))
}

async fn get_passenger_by_id(
    State(state): State<AppState>,
    Query(request): Query<GetPassengerById>,
) -> Result<Json<PassengerDto>, AppError> {
    Ok(Json(state.mediator.send(request).await?))
}
