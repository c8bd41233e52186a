//! # API document
//!
//! `GET /api/openapi.json` serves the generated OpenAPI document and `GET /api`
//! an interactive Swagger UI page that loads it.

use axum::{
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use shared::{
    City, Continent, Country, CreateCityRequest, CreateContinentRequest, CreateCountryRequest,
    ErrorBody, ErrorDetail, FieldError, UpdateCityRequest, UpdateContinentRequest,
    UpdateCountryRequest,
};
use tracing::info;
use utoipa::OpenApi;

use super::{city_apis, continent_apis, country_apis};
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GeoWiki API",
        description = "Reference catalog of continents, countries and cities"
    ),
    paths(
        continent_apis::create_continent,
        continent_apis::list_continents,
        continent_apis::get_continent,
        continent_apis::update_continent,
        continent_apis::delete_continent,
        country_apis::create_country,
        country_apis::list_countries,
        country_apis::get_country,
        country_apis::update_country,
        country_apis::delete_country,
        city_apis::create_city,
        city_apis::list_cities,
        city_apis::get_city,
        city_apis::update_city,
        city_apis::delete_city,
    ),
    components(schemas(
        Continent,
        CreateContinentRequest,
        UpdateContinentRequest,
        Country,
        CreateCountryRequest,
        UpdateCountryRequest,
        City,
        CreateCityRequest,
        UpdateCityRequest,
        ErrorBody,
        ErrorDetail,
        FieldError,
    )),
    tags(
        (name = "continent", description = "Top-level regions"),
        (name = "country", description = "Countries, each inside one continent"),
        (name = "city", description = "Cities, each inside one country")
    )
)]
pub struct ApiDoc;

const SWAGGER_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>GeoWiki API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(swagger_page))
        .route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> impl IntoResponse {
    info!("GET /api/openapi.json");
    Json(ApiDoc::openapi())
}

async fn swagger_page() -> impl IntoResponse {
    info!("GET /api");
    Html(SWAGGER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        let expected = [
            "/continent",
            "/continent/{id}",
            "/country",
            "/country/{id}",
            "/city",
            "/city/{id}",
        ];
        for path in expected {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
        for verb in ["get", "patch", "delete"] {
            assert!(paths["/city/{id}"].get(verb).is_some(), "missing {} /city/{{id}}", verb);
        }
        assert!(paths["/country"].get("post").is_some());
    }

    #[test]
    fn test_document_includes_wire_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = doc["components"]["schemas"].as_object().unwrap();

        for schema in ["Continent", "CreateCountryRequest", "UpdateCityRequest", "ErrorBody"] {
            assert!(schemas.contains_key(schema), "missing schema {}", schema);
        }
        let country = &schemas["Country"]["properties"];
        assert!(country.get("cou_name").is_some());
        assert!(country.get("con_id").is_some());
    }
}
