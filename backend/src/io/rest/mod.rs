//! # REST API Interface Layer
//!
//! HTTP endpoints for the catalog. Each resource module exposes a `router()`
//! nested under its path; handlers only extract, log and delegate to the
//! domain services, and every failure leaves as an [`crate::error::AppError`]
//! body.

pub mod city_apis;
pub mod continent_apis;
pub mod country_apis;
pub mod openapi;

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::CorsOrigins;
use crate::AppState;

/// Resource routes plus the API document
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/continent", continent_apis::router())
        .nest("/country", country_apis::router())
        .nest("/city", city_apis::router())
        .nest("/api", openapi::router())
}

/// CORS for browser clients. Credentials are allowed, so methods and headers
/// are listed explicitly.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Mirror => AllowOrigin::mirror_request(),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}
