use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// DbConnection owns the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if missing) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Self::setup_schema(&pool).await?;

        info!("Connected to database at {}", url);
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Private in-memory database for a single test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        // An in-memory database lives as long as its one connection
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS continents (
                con_id INTEGER PRIMARY KEY AUTOINCREMENT,
                con_name TEXT NOT NULL,
                con_description TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS countries (
                cou_id INTEGER PRIMARY KEY AUTOINCREMENT,
                cou_name TEXT NOT NULL,
                cou_language TEXT NOT NULL,
                cou_coin TEXT NOT NULL,
                cou_flag TEXT NOT NULL,
                cou_population INTEGER NOT NULL,
                con_id INTEGER NOT NULL REFERENCES continents(con_id) ON DELETE RESTRICT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cities (
                cit_id INTEGER PRIMARY KEY AUTOINCREMENT,
                cit_name TEXT NOT NULL,
                cit_population INTEGER NOT NULL,
                cit_latitude REAL NOT NULL,
                cit_longitude REAL NOT NULL,
                cou_id INTEGER NOT NULL REFERENCES countries(cou_id) ON DELETE RESTRICT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_countries_con_id ON countries(con_id)")
            .execute(pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cities_cou_id ON cities(cou_id)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries and close every connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
