pub mod use_resource_list;

pub use use_resource_list::{use_resource_list, ListAction, SaveRequest};
