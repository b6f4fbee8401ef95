use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use skyway_core::{Mediator, MediatorBuilder, RegistryError};
use skyway_flight::{CreateFlight, FlightDependencies, FlightDto, GetFlightById, GetFlights};
use skyway_shared::{PageParams, PagedResult};

use crate::{error::AppError, middleware::auth::access_auth_middleware, state::AppState};

pub fn build_mediator(deps: &FlightDependencies) -> Result<Mediator, RegistryError> {
    let mut builder = MediatorBuilder::new();
    skyway_flight::register_handlers(&mut builder, deps)?;
    Ok(builder.build())
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/flight/create", post(create_flight))
        .route("/api/v1/flight/get-by-id", get(get_flight_by_id))
        .route("/api/v1/flight/get-all", get(get_flights))
        .route_layer(from_fn_with_state(state.clone(), access_auth_middleware))
}

async fn create_flight(
    State(state): State<AppState>,
    Json(request): Json<CreateFlight>,
) -> Result<(StatusCode, Json<FlightDto>), AppError> {
    let flight = state.mediator.send(request).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

async fn get_flight_by_id(
    State(state): State<AppState>,
    Query(request): Query<GetFlightById>,
) -> Result<Json<FlightDto>, AppError> {
    Ok(Json(state.mediator.send(request).await?))
}

async fn get_flights(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PagedResult<FlightDto>>, AppError> {
    Ok(Json(state.mediator.send(GetFlights { params }).await?))
}
