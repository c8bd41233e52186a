//! # REST API for Countries
//!
//! Endpoints for creating, listing, retrieving, updating and deleting countries.

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
use shared::{Country, CreateCountryRequest, ErrorBody, UpdateCountryRequest};
use tracing::{error, info};

use crate::error::AppError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_countries).post(create_country))
        .route(
            "/:id",
            get(get_country).patch(update_country).delete(delete_country),
        )
}

/// Create a new country
#[utoipa::path(
    post,
    path = "/country",
    tag = "country",
    request_body = CreateCountryRequest,
    responses(
        (status = 201, description = "Country created", body = Country),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 422, description = "Continent does not exist", body = ErrorBody)
    )
)]
pub async fn create_country(
    State(state): State<AppState>,
    payload: Result<Json<CreateCountryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    info!("POST /country - request: {:?}", request);

    let country = state
        .country_service
        .create(request)
        .await
        .inspect_err(|e| error!("Failed to create country: {}", e))?;
    Ok((StatusCode::CREATED, Json(country)))
}

/// List all countries
#[utoipa::path(
    get,
    path = "/country",
    tag = "country",
    responses((status = 200, description = "Every country", body = [Country]))
)]
pub async fn list_countries(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    info!("GET /country");

    let countries = state
        .country_service
        .find_all()
        .await
        .inspect_err(|e| error!("Failed to list countries: {}", e))?;
    Ok(Json(countries))
}

/// Get a country by ID
#[utoipa::path(
    get,
    path = "/country/{id}",
    tag = "country",
    params(("id" = i64, Path, description = "Country id")),
    responses(
        (status = 200, description = "The country", body = Country),
        (status = 404, description = "No such country", body = ErrorBody)
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    info!("GET /country/{}", id);

    let country = state
        .country_service
        .find_one(id)
        .await
        .inspect_err(|e| error!("Failed to get country: {}", e))?;
    Ok(Json(country))
}

/// Update the supplied fields of a country
#[utoipa::path(
    patch,
    path = "/country/{id}",
    tag = "country",
    params(("id" = i64, Path, description = "Country id")),
    request_body = UpdateCountryRequest,
    responses(
        (status = 200, description = "The updated country", body = Country),
        (status = 400, description = "Invalid body", body = ErrorBody),
        (status = 404, description = "No such country", body = ErrorBody),
        (status = 422, description = "Continent does not exist", body = ErrorBody)
    )
)]
pub async fn update_country(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCountryRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    let Json(changes) = payload?;
    info!("PATCH /country/{} - request: {:?}", id, changes);

    let country = state
        .country_service
        .update(id, changes)
        .await
        .inspect_err(|e| error!("Failed to update country: {}", e))?;
    Ok(Json(country))
}

/// Delete a country that no city references
#[utoipa::path(
    delete,
    path = "/country/{id}",
    tag = "country",
    params(("id" = i64, Path, description = "Country id")),
    responses(
        (status = 200, description = "The deleted country", body = Country),
        (status = 404, description = "No such country", body = ErrorBody),
        (status = 409, description = "Cities still belong to the country", body = ErrorBody)
    )
)]
pub async fn delete_country(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(id) = id?;
    info!("DELETE /country/{}", id);

    let country = state
        .country_service
        .remove(id)
        .await
        .inspect_err(|e| error!("Failed to delete country: {}", e))?;
    Ok(Json(country))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use crate::test_support::{send, test_state, TestResult};
    use axum::http::Method;
    use serde_json::{json, Value};

    async fn create_continents(app: &Router, names: &[&str]) -> TestResult {
        for name in names {
            let (status, _) = send(
                app,
                Method::POST,
                "/continent",
                Some(json!({"name": name, "description": "Continente de teste com descrição"})),
            )
            .await?;
            assert_eq!(status, StatusCode::CREATED);
        }
        Ok(())
    }

    fn brasil(continent_id: i64) -> Value {
        json!({
            "name": "Brasil",
            "language": "Português",
            "coin": "Real",
            "flag": "🇧🇷",
            "population": 213000000,
            "continentId": continent_id
        })
    }

    #[tokio::test]
    async fn test_create_country_in_existing_continent() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        create_continents(&app, &["América do Norte", "América do Sul"]).await?;

        let (status, body) = send(&app, Method::POST, "/country", Some(brasil(2))).await?;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body,
            json!({
                "cou_id": 1,
                "cou_name": "Brasil",
                "cou_language": "Português",
                "cou_coin": "Real",
                "cou_flag": "🇧🇷",
                "cou_population": 213000000,
                "con_id": 2
            })
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_country_in_missing_continent_is_rejected() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        create_continents(&app, &["América do Norte", "América do Sul"]).await?;

        let (status, body) = send(&app, Method::POST, "/country", Some(brasil(999))).await?;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "invalid_reference");
        assert_eq!(body["error"]["message"], "continent 999 does not exist");

        let (_, listed) = send(&app, Method::GET, "/country", None).await?;
        assert_eq!(listed, json!([]));
        Ok(())
    }

    #[tokio::test]
    async fn test_patch_country_changes_only_supplied_fields() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        create_continents(&app, &["América do Norte", "América do Sul"]).await?;
        let (_, created) = send(&app, Method::POST, "/country", Some(brasil(2))).await?;

        let (status, patched) = send(
            &app,
            Method::PATCH,
            "/country/1",
            Some(json!({"population": 214000000, "continentId": 1})),
        )
        .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["cou_population"], 214000000);
        assert_eq!(patched["con_id"], 1);
        for column in ["cou_name", "cou_language", "cou_coin", "cou_flag"] {
            assert_eq!(patched[column], created[column]);
        }

        let (status, unchanged) = send(&app, Method::PATCH, "/country/1", Some(json!({}))).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(unchanged, patched);
        Ok(())
    }

    #[tokio::test]
    async fn test_patch_missing_country_with_dangling_continent_is_not_found() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        create_continents(&app, &["América do Sul"]).await?;

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/country/77",
            Some(json!({"continentId": 999})),
        )
        .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
        assert_eq!(body["error"]["message"], "country 77 not found");
        Ok(())
    }

    #[tokio::test]
    async fn test_deleting_continent_with_countries_conflicts() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        create_continents(&app, &["América do Norte", "América do Sul"]).await?;
        send(&app, Method::POST, "/country", Some(brasil(2))).await?;

        let (status, body) = send(&app, Method::DELETE, "/continent/2", None).await?;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "conflict");

        let (status, _) = send(&app, Method::GET, "/continent/2", None).await?;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, "/country/1", None).await?;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::DELETE, "/continent/2", None).await?;
        assert_eq!(status, StatusCode::OK);
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_population_is_rejected() -> TestResult {
        let app = create_router(test_state().await?, &Default::default());
        create_continents(&app, &["América do Sul"]).await?;

        let mut body = brasil(1);
        body["population"] = json!(-10);
        let (status, response) = send(&app, Method::POST, "/country", Some(body)).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["details"][0]["field"], "population");
        Ok(())
    }
}
