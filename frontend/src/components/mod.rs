pub mod city_manager;
pub mod continent_manager;
pub mod country_manager;
pub mod dashboard;
pub mod header;
pub mod map_view;
pub mod resource_form_modal;

pub use city_manager::CityManager;
pub use continent_manager::ContinentManager;
pub use country_manager::CountryManager;
pub use dashboard::Dashboard;
pub use header::{Header, Tab};
pub use map_view::MapView;
