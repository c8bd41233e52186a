//! # Storage
//!
//! SQLite persistence for the catalog. [`DbConnection`] owns the pool and the
//! schema; [`Repository`] turns any [`shared::Resource`] into SQL using its
//! field-mapping table, so no entity has hand-written queries.

pub mod connection;
pub mod repository;
pub mod seed;

pub use connection::DbConnection;
pub use repository::Repository;
