//! # REST API for Continents
//!
//! Endpoints for creating, listing, retrieving, updating and deleting continents.

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
use shared::{Continent, CreateContinentRequest, ErrorBody, UpdateContinentRequest};
use tracing::{error, info};

use crate::error::AppError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_continents).post(create_continent))
        .route(
            "/:id",
            get(get_continent).patch(update_continent).delete(delete_continent),
        )
}

/// Create a new continent
#[utoipa::path(
    post,
    path = "/continent",
    tag = "continent",
    request_body = CreateContinentRequest,
    responses(
        (status = 201, description = "Continent created", body = Continent),
        (status = 400, description = "Invalid body", body = ErrorBody)
    )
)]
pub async fn create_continent(
    State(state): State<AppState>,
    payload: Result<Json<CreateContinentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    info!("POST /continent - request: {:?}", request);

    let continent = state
        .continent_service
        .create(request)
        .await
        .inspect_err(|e| error!("Failed to create continent: {}", e))?;
    Ok((StatusCode::CREATED, Json(continent)))
}

/// List all continents
#[utoipa::path(
    get,
    path = "/continent",
    tag = "continent",
    responses((status = 200, description = "Every continent", body = [Continent]))
)]
pub async fn list_continents(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("GET /continent");

    let continents = state
        .continent_service
        .find_all()
        .await
        .inspect_err(|e| error!("Failed to list continents: {}", e))?;
    Ok(Json(continents))
}

/// Get a continent by ID
#[utoipa::path(
    get,
    path = "/continent/{id}",
    tag = "continent",
    params(("id" = i64, Path, description = "Continent id")),
    responses(
        (status = 200, description = "The continent", body = Continent),
        (status = 404, description = "No such continent", body = ErrorBody)
    )
)]
pub async fn get_continent(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    info!("GET /continent/{}", id);

    let continent = state
        .continent_service
        .find_one(id)
        .await
        .inspect_err(|e| error!("Failed to get continent: {}", e))?;
    Ok(Json(continent))
}

/// Update the supplied fields of a continent
#[utoipa::path(
    patch,
    path = "/continent/{id}",
    tag = "continent",
    params(("id" = i64, Path, description = "Continent id")),
    request_body = UpdateContinentRequest,
    responses(
        (status = 200, description = "The updated continent", body = Continent),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such continent", body = ErrorBody)
    )
)]
pub async fn update_continent(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateContinentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    info!("PATCH /continent/{} - request: {:?}", id, changes);

    let continent = state
        .continent_service
        .update(id, changes)
        .await
        .inspect_err(|e| error!("Failed to update continent: {}", e))?;
    Ok(Json(continent))
}

/// Delete a continent that no country references
#[utoipa::path(
    delete,
    path = "/continent/{id}",
    tag = "continent",
    params(("id" = i64, Path, description = "Continent id")),
    responses(
        (status = 200, description = "The deleted continent", body = Continent),
        (status = 404, description = "No such continent", body = ErrorBody),
        (status = 409, description = "Countries still belong to the continent", body = ErrorBody)
    )
)]
pub async fn delete_continent(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    info!("DELETE /continent/{}", id);

    let continent = state
        .continent_service
        .remove(id)
        .await
        .inspect_err(|e| error!("Failed to delete continent: {}", e))?;
    Ok(Json(continent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use crate::test_support::{send, test_state, TestResult};
    use axum::http::Method;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_create_continent_returns_row_with_new_id() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());

        let (status, body) = send(
            &app,
            Method::POST,
            "/continent",
            Some(json!({
                "name": "Ásia",
                "description": "Maior continente em área e população"
            })),
        )
        .await?;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "con_id": 1,
                "con_name": "Ásia",
                "con_description": "Maior continente em área e população"
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_continent_crud_cycle() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());

        let (_, created) = send(
            &app,
            Method::POST,
            "/continent",
            Some(json!({
                "name": "Europa",
                "description": "Continente localizado no hemisfério norte"
            })),
        )
        .await?;
        let id = created["con_id"].as_i64().unwrap();

        let (status, fetched) = send(&app, Method::GET, &format!("/continent/{id}"), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, patched) = send(
            &app,
            Method::PATCH,
            &format!("/continent/{id}"),
            Some(json!({"name": "Europa Ocidental"})),
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["con_name"], "Europa Ocidental");
        assert_eq!(patched["con_description"], created["con_description"]);

        let (status, listed) = send(&app, Method::GET, "/continent", None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([patched]));

        let (status, deleted) =
            send(&app, Method::DELETE, &format!("/continent/{id}"), None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, patched);

        let (status, body) = send(&app, Method::GET, &format!("/continent/{id}"), None).await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_continent_reports_each_field() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());

        let (status, body) = send(
            &app,
            Method::POST,
            "/continent",
            Some(json!({"name": "Eu", "description": ""})),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        let fields: Vec<&str> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["name", "description"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_padded_over_length_name_is_not_stored() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        let name = format!("{}{}", "x".repeat(100), " ".repeat(50));

        let (status, body) = send(
            &app,
            Method::POST,
            "/continent",
            Some(json!({"name": name, "description": "Continente de teste com descrição"})),
        )
        .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "name");

        let (_, listed) = send(&app, Method::GET, "/continent", None).await?;
        assert_eq!(listed, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());

        let body = Some(json!({"name": "Ásia"}));
        let (status, body) = send(&app, Method::POST, "/continent", body).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"][0]["field"], "description");
        Ok(())
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_a_bad_request() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());

        let (status, body) = send(&app, Method::GET, "/continent/asia", None).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_continent_is_not_found_for_every_verb() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());

        for (method, body) in [
            (Method::GET, None),
            (Method::PATCH, Some(json!({"name": "Lemúria"}))),
            (Method::DELETE, None),
        ] {
            let (status, response): (StatusCode, Value) =
                send(&app, method, "/continent/99", body).await?;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(response["error"]["message"], "continent 99 not found");
        }
        Ok(())
    }
}
