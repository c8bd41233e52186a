//! # Domain
//!
//! One [`ResourceService`] per catalog entity. Services validate request bodies,
//! check that referenced parents exist, refuse to delete rows that still have
//! dependents, and translate storage misses into [`crate::error::AppError`].

pub mod resource_service;
pub mod validation;

pub use resource_service::{CityService, ContinentService, CountryService, ResourceService};
pub use validation::Validate;
