pub mod api;
pub mod weather;
