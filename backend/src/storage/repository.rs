//! Mapping-driven SQL for any catalog resource.
//!
//! A DTO is serialized to a JSON object and every mapped field that is present
//! and non-null becomes a `(column, value)` assignment. Rows come back the other
//! way: each mapped column is read by its [`FieldKind`], collected into a JSON
//! object keyed by column and deserialized into the row type.

use std::marker::PhantomData;

use serde::Serialize;
use serde_json::{Map, Value};
use shared::{FieldKind, ParentLink, Resource};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Executor, Row, Sqlite};

use super::DbConnection;

/// A value bound to a query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl SqlValue {
    /// `None` for null or for a JSON value that does not fit the column kind
    fn from_json(kind: FieldKind, value: &Value) -> Option<Self> {
        match kind {
            FieldKind::Text => value.as_str().map(|s| SqlValue::Text(s.to_string())),
            FieldKind::Integer => value.as_i64().map(SqlValue::Integer),
            FieldKind::Real => value.as_f64().map(SqlValue::Real),
        }
    }
}

/// Column assignments for every mapped field present in `dto`
pub fn assignments<R: Resource, T: Serialize>(
    dto: &T,
) -> sqlx::Result<Vec<(&'static str, SqlValue)>> {
    let value = serde_json::to_value(dto).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    Ok(R::FIELDS
        .iter()
        .filter_map(|mapping| {
            value
                .get(mapping.field)
                .and_then(|v| SqlValue::from_json(mapping.kind, v))
                .map(|v| (mapping.column, v))
        })
        .collect())
}

/// Integer value of a single DTO field, if present
pub fn integer_field<T: Serialize>(dto: &T, field: &str) -> Option<i64> {
    serde_json::to_value(dto)
        .ok()
        .and_then(|value| value.get(field).and_then(Value::as_i64))
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    values: Vec<SqlValue>,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in values {
        query = match value {
            SqlValue::Text(s) => query.bind(s),
            SqlValue::Integer(i) => query.bind(i),
            SqlValue::Real(f) => query.bind(f),
        };
    }
    query
}

fn decode_row<R: Resource>(row: &SqliteRow) -> sqlx::Result<R> {
    let mut object = Map::new();
    object.insert(R::ID_COLUMN.to_string(), Value::from(row.try_get::<i64, _>(R::ID_COLUMN)?));
    for mapping in R::FIELDS {
        let value = match mapping.kind {
            FieldKind::Text => Value::from(row.try_get::<String, _>(mapping.column)?),
            FieldKind::Integer => Value::from(row.try_get::<i64, _>(mapping.column)?),
            FieldKind::Real => Value::from(row.try_get::<f64, _>(mapping.column)?),
        };
        object.insert(mapping.column.to_string(), value);
    }
    serde_json::from_value(Value::Object(object)).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Single-table access for one resource type
pub struct Repository<R> {
    db: DbConnection,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            _resource: PhantomData,
        }
    }

    fn select_list() -> String {
        std::iter::once(R::ID_COLUMN)
            .chain(R::FIELDS.iter().map(|mapping| mapping.column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub async fn insert(&self, input: &R::Create) -> sqlx::Result<R> {
        Self::insert_with(self.db.pool(), input).await
    }

    /// Insert through any executor, such as an open transaction
    pub async fn insert_with<'c, E>(executor: E, input: &R::Create) -> sqlx::Result<R>
    where
        E: Executor<'c, Database = Sqlite>,
    {
        let (columns, values): (Vec<&str>, Vec<SqlValue>) =
            assignments::<R, _>(input)?.into_iter().unzip();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            R::TABLE,
            columns.join(", "),
            placeholders,
            Self::select_list()
        );

        let row = bind_all(sqlx::query(&sql), values).fetch_one(executor).await?;
        decode_row::<R>(&row)
    }

    /// Every row, oldest id first
    pub async fn find_all(&self) -> sqlx::Result<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            Self::select_list(),
            R::TABLE,
            R::ID_COLUMN
        );
        let rows = sqlx::query(&sql).fetch_all(self.db.pool()).await?;
        rows.iter().map(decode_row::<R>).collect()
    }

    pub async fn find_one(&self, id: i64) -> sqlx::Result<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            Self::select_list(),
            R::TABLE,
            R::ID_COLUMN
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.db.pool()).await?;
        row.as_ref().map(decode_row::<R>).transpose()
    }

    /// Apply the fields present in `changes`. `None` when the id does not exist.
    pub async fn update(&self, id: i64, changes: &R::Update) -> sqlx::Result<Option<R>> {
        let (columns, mut values): (Vec<&str>, Vec<SqlValue>) =
            assignments::<R, _>(changes)?.into_iter().unzip();
        if columns.is_empty() {
            return self.find_one(id).await;
        }

        let set = columns
            .iter()
            .map(|column| format!("{column} = ?"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ? RETURNING {}",
            R::TABLE,
            set,
            R::ID_COLUMN,
            Self::select_list()
        );
        values.push(SqlValue::Integer(id));

        let row = bind_all(sqlx::query(&sql), values)
            .fetch_optional(self.db.pool())
            .await?;
        row.as_ref().map(decode_row::<R>).transpose()
    }

    /// Delete the row and hand it back. `None` when the id does not exist.
    pub async fn delete(&self, id: i64) -> sqlx::Result<Option<R>> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ? RETURNING {}",
            R::TABLE,
            R::ID_COLUMN,
            Self::select_list()
        );
        let row = sqlx::query(&sql).bind(id).fetch_optional(self.db.pool()).await?;
        row.as_ref().map(decode_row::<R>).transpose()
    }

    pub async fn exists(&self, id: i64) -> sqlx::Result<bool> {
        row_exists(&self.db, R::TABLE, R::ID_COLUMN, id).await
    }

    pub async fn parent_exists(&self, parent: ParentLink, id: i64) -> sqlx::Result<bool> {
        row_exists(&self.db, parent.table, parent.id_column, id).await
    }

    /// Rows in the dependent table pointing at `id`; zero for leaf resources
    pub async fn count_children(&self, id: i64) -> sqlx::Result<i64> {
        let Some(child) = R::CHILD else {
            return Ok(0);
        };
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?", child.table, child.column);
        let row = sqlx::query(&sql).bind(id).fetch_one(self.db.pool()).await?;
        row.try_get::<i64, _>(0)
    }
}

async fn row_exists(
    db: &DbConnection,
    table: &str,
    id_column: &str,
    id: i64,
) -> sqlx::Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE {id_column} = ?)");
    let row = sqlx::query(&sql).bind(id).fetch_one(db.pool()).await?;
    Ok(row.try_get::<i64, _>(0)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{
        City, Continent, Country, CreateCityRequest, CreateContinentRequest, CreateCountryRequest,
        UpdateCountryRequest,
    };

    async fn setup_test() -> DbConnection {
        DbConnection::init_test().await.expect("Failed to create test database")
    }

    fn europa() -> CreateContinentRequest {
        CreateContinentRequest {
            name: "Europa".to_string(),
            description: "Continente localizado no hemisfério norte".to_string(),
        }
    }

    fn franca(continent_id: i64) -> CreateCountryRequest {
        CreateCountryRequest {
            name: "França".to_string(),
            language: "Francês".to_string(),
            coin: "Euro".to_string(),
            flag: "🇫🇷".to_string(),
            population: 67_000_000,
            continent_id,
        }
    }

    #[test]
    fn test_assignments_follow_mapping_table() {
        let values = assignments::<Country, _>(&franca(3)).unwrap();
        assert_eq!(
            values,
            vec![
                ("cou_name", SqlValue::Text("França".to_string())),
                ("cou_language", SqlValue::Text("Francês".to_string())),
                ("cou_coin", SqlValue::Text("Euro".to_string())),
                ("cou_flag", SqlValue::Text("🇫🇷".to_string())),
                ("cou_population", SqlValue::Integer(67_000_000)),
                ("con_id", SqlValue::Integer(3)),
            ]
        );
    }

    #[test]
    fn test_assignments_skip_absent_update_fields() {
        let changes = UpdateCountryRequest {
            population: Some(68_000_000),
            ..Default::default()
        };
        let values = assignments::<Country, _>(&changes).unwrap();
        assert_eq!(values, vec![("cou_population", SqlValue::Integer(68_000_000))]);

        let none = assignments::<Country, _>(&UpdateCountryRequest::default()).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_integer_field_reads_parent_id() {
        assert_eq!(integer_field(&franca(3), "continentId"), Some(3));
        assert_eq!(integer_field(&UpdateCountryRequest::default(), "continentId"), None);
    }

    #[tokio::test]
    async fn test_insert_and_find_one() {
        let repo = Repository::<Continent>::new(setup_test().await);

        let created = repo.insert(&europa()).await.expect("Failed to insert");
        assert_eq!(created.name, "Europa");
        assert_eq!(created.description, "Continente localizado no hemisfério norte");

        let found = repo.find_one(created.id).await.expect("Query failed");
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_find_all_is_ordered_by_id() {
        let repo = Repository::<Continent>::new(setup_test().await);
        let first = repo.insert(&europa()).await.unwrap();
        let second = repo
            .insert(&CreateContinentRequest {
                name: "América do Sul".to_string(),
                description: "Continente localizado no hemisfério sul".to_string(),
            })
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_untouched_columns() {
        let db = setup_test().await;
        let continent = Repository::<Continent>::new(db.clone()).insert(&europa()).await.unwrap();
        let repo = Repository::<Country>::new(db);
        let created = repo.insert(&franca(continent.id)).await.unwrap();

        let changes = UpdateCountryRequest {
            coin: Some("Franco".to_string()),
            ..Default::default()
        };
        let updated = repo.update(created.id, &changes).await.unwrap().expect("row exists");

        assert_eq!(updated.coin, "Franco");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.population, created.population);
        assert_eq!(updated.continent_id, created.continent_id);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_id_return_none() {
        let repo = Repository::<Country>::new(setup_test().await);
        let changes = UpdateCountryRequest {
            name: Some("Nada".to_string()),
            ..Default::default()
        };
        assert!(repo.update(77, &changes).await.unwrap().is_none());
        assert!(repo.update(77, &UpdateCountryRequest::default()).await.unwrap().is_none());
        assert!(repo.delete(77).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let repo = Repository::<Continent>::new(setup_test().await);
        let created = repo.insert(&europa()).await.unwrap();

        let deleted = repo.delete(created.id).await.unwrap();
        assert_eq!(deleted, Some(created.clone()));
        assert!(!repo.exists(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = Repository::<Continent>::new(setup_test().await);
        let first = repo.insert(&europa()).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.insert(&europa()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_count_children_and_parent_exists() {
        let db = setup_test().await;
        let continents = Repository::<Continent>::new(db.clone());
        let countries = Repository::<Country>::new(db.clone());
        let cities = Repository::<City>::new(db);

        let continent = continents.insert(&europa()).await.unwrap();
        let country = countries.insert(&franca(continent.id)).await.unwrap();
        cities
            .insert(&CreateCityRequest {
                name: "Paris".to_string(),
                population: 2_148_000,
                latitude: 48.8566,
                longitude: 2.3522,
                country_id: country.id,
            })
            .await
            .unwrap();

        assert_eq!(continents.count_children(continent.id).await.unwrap(), 1);
        assert_eq!(countries.count_children(country.id).await.unwrap(), 1);
        assert_eq!(cities.count_children(1).await.unwrap(), 0);

        let parent = Country::PARENT.unwrap();
        assert!(countries.parent_exists(parent, continent.id).await.unwrap());
        assert!(!countries.parent_exists(parent, 999).await.unwrap());
    }

    #[tokio::test]
    async fn test_city_coordinates_round_trip() {
        let db = setup_test().await;
        let continent = Repository::<Continent>::new(db.clone()).insert(&europa()).await.unwrap();
        let country = Repository::<Country>::new(db.clone())
            .insert(&franca(continent.id))
            .await
            .unwrap();
        let repo = Repository::<City>::new(db);

        let city = repo
            .insert(&CreateCityRequest {
                name: "Marselha".to_string(),
                population: 861_635,
                latitude: 43.2965,
                longitude: 5.3698,
                country_id: country.id,
            })
            .await
            .unwrap();

        let found = repo.find_one(city.id).await.unwrap().unwrap();
        assert_eq!(found.latitude, 43.2965);
        assert_eq!(found.longitude, 5.3698);
        assert_eq!(found.country_id, country.id);
    }
}
