//! # GeoWiki backend
//!
//! REST service over a SQLite catalog of continents, countries and cities.
//!
//! ## Layers
//!
//! - **storage**: connection pool, schema, mapping-driven repository, seed data
//! - **domain**: validation and per-resource services
//! - **io::rest**: axum handlers, CORS and the OpenAPI document
//!
//! `main` builds a [`Config`], calls [`initialize_backend`] once and serves the
//! router from [`create_router`]; nothing is kept in globals.

pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::Router;
use tower_http::services::ServeDir;
use tracing::info;

pub use config::Config;
use domain::{CityService, ContinentService, CountryService};
use storage::DbConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub continent_service: ContinentService,
    pub country_service: CountryService,
    pub city_service: CityService,
}

impl AppState {
    pub fn new(db: DbConnection) -> Self {
        Self {
            continent_service: ContinentService::new(db.clone()),
            country_service: CountryService::new(db.clone()),
            city_service: CityService::new(db.clone()),
            db,
        }
    }
}

/// Open the database, optionally seed it, and build the services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url).await?;

    if config.seed {
        info!("Seeding demonstration catalog");
        storage::seed::seed_catalog(&db).await?;
    }

    info!("Setting up domain model");
    Ok(AppState::new(db))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Router {
    let cors = io::rest::cors_layer(&config.cors_origins);

    let mut router = io::rest::api_router();
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router.layer(cors).with_state(app_state)
}
