//! # REST API for Cities
//!
//! Endpoints for creating, listing, retrieving, updating and deleting cities.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{City, CreateCityRequest, ErrorBody, UpdateCityRequest};
use tracing::{error, info};

use crate::error::AppError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cities).post(create_city))
        .route(
            "/:id",
            get(get_city).patch(update_city).delete(delete_city),
        )
}

/// Create a new city
#[utoipa::path(
    post,
    path = "/city",
    tag = "city",
    request_body = CreateCityRequest,
    responses(
        (status = 201, description = "City created", body = City),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 422, description = "Country does not exist", body = ErrorBody)
    )
)]
pub async fn create_city(
    State(state): State<AppState>,
    payload: Result<Json<CreateCityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    info!("POST /city - request: {:?}", request);

    let city = state
        .city_service
        .create(request)
        .await
        .inspect_err(|e| error!("Failed to create city: {}", e))?;
    Ok((StatusCode::CREATED, Json(city)))
}

/// List all cities
#[utoipa::path(
    get,
    path = "/city",
    tag = "city",
    responses((status = 200, description = "Every city", body = [City]))
)]
pub async fn list_cities(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("GET /city");

    let cities = state
        .city_service
        .find_all()
        .await
        .inspect_err(|e| error!("Failed to list cities: {}", e))?;
    Ok(Json(cities))
}

/// Get a city by ID
#[utoipa::path(
    get,
    path = "/city/{id}",
    tag = "city",
    params(("id" = i64, Path, description = "City id")),
    responses(
        (status = 200, description = "The city", body = City),
        (status = 404, description = "No such city", body = ErrorBody)
    )
)]
pub async fn get_city(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    info!("GET /city/{}", id);

    let city = state
        .city_service
        .find_one(id)
        .await
        .inspect_err(|e| error!("Failed to get city: {}", e))?;
    Ok(Json(city))
}

/// Update the supplied fields of a city
#[utoipa::path(
    patch,
    path = "/city/{id}",
    tag = "city",
    params(("id" = i64, Path, description = "City id")),
    request_body = UpdateCityRequest,
    responses(
        (status = 200, description = "The updated city", body = City),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such city", body = ErrorBody),
        (status = 422, description = "Country does not exist", body = ErrorBody)
    )
)]
pub async fn update_city(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCityRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    info!("PATCH /city/{} - request: {:?}", id, changes);

    let city = state
        .city_service
        .update(id, changes)
        .await
        .inspect_err(|e| error!("Failed to update city: {}", e))?;
    Ok(Json(city))
}

/// Delete a city
#[utoipa::path(
    delete,
    path = "/city/{id}",
    tag = "city",
    params(("id" = i64, Path, description = "City id")),
    responses(
        (status = 200, description = "The deleted city", body = City),
        (status = 404, description = "No such city", body = ErrorBody)
    )
)]
pub async fn delete_city(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    info!("DELETE /city/{}", id);

    let city = state
        .city_service
        .remove(id)
        .await
        .inspect_err(|e| error!("Failed to delete city: {}", e))?;
    Ok(Json(city))
}
