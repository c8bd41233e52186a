//! Wire types shared between the GeoWiki server and the browser client.
//!
//! Rows travel with their stored column names (`con_id`, `cou_name`, ...) while
//! request bodies use the DTO names (`name`, `continentId`, ...). Both naming
//! schemes are listed in one [`FieldMapping`] table per entity; the serde renames
//! below mirror those tables and the tests at the bottom keep them in step.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod catalog;
pub mod form;
pub mod weather;

/// Storage type of a mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Real,
}

/// One row of an entity's field-mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Name used in request bodies
    pub field: &'static str,
    /// Stored column name, also the key used in response rows
    pub column: &'static str,
    /// Label shown by the UI
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldMapping {
    const fn new(
        field: &'static str,
        column: &'static str,
        label: &'static str,
        kind: FieldKind,
    ) -> Self {
        Self { field, column, label, kind }
    }
}

/// Foreign key from an entity to the entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    /// DTO field carrying the parent id
    pub field: &'static str,
    pub resource: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
}

/// Table holding the rows that reference an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildLink {
    pub resource: &'static str,
    pub table: &'static str,
    /// Foreign-key column in the child table
    pub column: &'static str,
}

/// A catalog entity: its row type plus everything needed to store and display it.
pub trait Resource:
    Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static
{
    const NAME: &'static str;
    const PATH: &'static str;
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const FIELDS: &'static [FieldMapping];
    const PARENT: Option<ParentLink> = None;
    const CHILD: Option<ChildLink> = None;

    type Create: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Update: Serialize + DeserializeOwned + Clone + Debug + Default + Send + Sync + 'static;

    fn id(&self) -> i64;
    fn name(&self) -> &str;

    fn parent_id(&self) -> Option<i64> {
        None
    }

    fn field(field: &str) -> Option<&'static FieldMapping> {
        Self::FIELDS.iter().find(|mapping| mapping.field == field)
    }
}

// ---------------------------------------------------------------------------
// Continent
// ---------------------------------------------------------------------------

pub const CONTINENT_FIELDS: &[FieldMapping] = &[
    FieldMapping::new("name", "con_name", "Name", FieldKind::Text),
    FieldMapping::new("description", "con_description", "Description", FieldKind::Text),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Continent {
    #[serde(rename = "con_id")]
    pub id: i64,
    #[serde(rename = "con_name")]
    pub name: String,
    #[serde(rename = "con_description")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateContinentRequest {
    /// Continent name (3-100 characters)
    #[cfg_attr(feature = "openapi", schema(example = "Ásia"))]
    pub name: String,
    /// Free-text description (10-500 characters)
    #[cfg_attr(feature = "openapi", schema(example = "Maior continente em área e população"))]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateContinentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Continent {
    const NAME: &'static str = "continent";
    const PATH: &'static str = "/continent";
    const TABLE: &'static str = "continents";
    const ID_COLUMN: &'static str = "con_id";
    const FIELDS: &'static [FieldMapping] = CONTINENT_FIELDS;
    const CHILD: Option<ChildLink> = Some(ChildLink {
        resource: "country",
        table: "countries",
        column: "con_id",
    });

    type Create = CreateContinentRequest;
    type Update = UpdateContinentRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Country
// ---------------------------------------------------------------------------

pub const COUNTRY_FIELDS: &[FieldMapping] = &[
    FieldMapping::new("name", "cou_name", "Name", FieldKind::Text),
    FieldMapping::new("language", "cou_language", "Official language", FieldKind::Text),
    FieldMapping::new("coin", "cou_coin", "Currency", FieldKind::Text),
    FieldMapping::new("flag", "cou_flag", "Flag", FieldKind::Text),
    FieldMapping::new("population", "cou_population", "Population", FieldKind::Integer),
    FieldMapping::new("continentId", "con_id", "Continent", FieldKind::Integer),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Country {
    #[serde(rename = "cou_id")]
    pub id: i64,
    #[serde(rename = "cou_name")]
    pub name: String,
    #[serde(rename = "cou_language")]
    pub language: String,
    #[serde(rename = "cou_coin")]
    pub coin: String,
    #[serde(rename = "cou_flag")]
    pub flag: String,
    #[serde(rename = "cou_population")]
    pub population: i64,
    #[serde(rename = "con_id")]
    pub continent_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCountryRequest {
    #[cfg_attr(feature = "openapi", schema(example = "Brasil"))]
    pub name: String,
    /// Official language
    #[cfg_attr(feature = "openapi", schema(example = "Português"))]
    pub language: String,
    /// Currency
    #[cfg_attr(feature = "openapi", schema(example = "Real"))]
    pub coin: String,
    #[cfg_attr(feature = "openapi", schema(example = "🇧🇷"))]
    pub flag: String,
    #[cfg_attr(feature = "openapi", schema(example = 213000000))]
    pub population: i64,
    #[serde(rename = "continentId")]
    #[cfg_attr(feature = "openapi", schema(example = 2))]
    pub continent_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCountryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,
    #[serde(rename = "continentId", default, skip_serializing_if = "Option::is_none")]
    pub continent_id: Option<i64>,
}

impl Resource for Country {
    const NAME: &'static str = "country";
    const PATH: &'static str = "/country";
    const TABLE: &'static str = "countries";
    const ID_COLUMN: &'static str = "cou_id";
    const FIELDS: &'static [FieldMapping] = COUNTRY_FIELDS;
    const PARENT: Option<ParentLink> = Some(ParentLink {
        field: "continentId",
        resource: "continent",
        table: "continents",
        id_column: "con_id",
    });
    const CHILD: Option<ChildLink> = Some(ChildLink {
        resource: "city",
        table: "cities",
        column: "cou_id",
    });

    type Create = CreateCountryRequest;
    type Update = UpdateCountryRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.continent_id)
    }
}

// ---------------------------------------------------------------------------
// City
// ---------------------------------------------------------------------------

pub const CITY_FIELDS: &[FieldMapping] = &[
    FieldMapping::new("name", "cit_name", "Name", FieldKind::Text),
    FieldMapping::new("population", "cit_population", "Population", FieldKind::Integer),
    FieldMapping::new("latitude", "cit_latitude", "Latitude", FieldKind::Real),
    FieldMapping::new("longitude", "cit_longitude", "Longitude", FieldKind::Real),
    FieldMapping::new("countryId", "cou_id", "Country", FieldKind::Integer),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct City {
    #[serde(rename = "cit_id")]
    pub id: i64,
    #[serde(rename = "cit_name")]
    pub name: String,
    #[serde(rename = "cit_population")]
    pub population: i64,
    #[serde(rename = "cit_latitude")]
    pub latitude: f64,
    #[serde(rename = "cit_longitude")]
    pub longitude: f64,
    #[serde(rename = "cou_id")]
    pub country_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCityRequest {
    #[cfg_attr(feature = "openapi", schema(example = "São Paulo"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = 12300000))]
    pub population: i64,
    /// Degrees, -90 to 90
    pub latitude: f64,
    /// Degrees, -180 to 180
    pub longitude: f64,
    #[serde(rename = "countryId")]
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub country_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCityRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "countryId", default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<i64>,
}

impl Resource for City {
    const NAME: &'static str = "city";
    const PATH: &'static str = "/city";
    const TABLE: &'static str = "cities";
    const ID_COLUMN: &'static str = "cit_id";
    const FIELDS: &'static [FieldMapping] = CITY_FIELDS;
    const PARENT: Option<ParentLink> = Some(ParentLink {
        field: "countryId",
        resource: "country",
        table: "countries",
        id_column: "cou_id",
    });

    type Create = CreateCityRequest;
    type Update = UpdateCityRequest;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.country_id)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single rejected field in a request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorDetail {
    /// Machine-readable code: validation_error, bad_request, not_found, conflict,
    /// invalid_reference or database_error
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}
