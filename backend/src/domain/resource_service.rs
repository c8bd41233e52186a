use shared::{City, Continent, Country, Resource};
use tracing::{info, warn};

use super::validation::{ensure_valid, Validate};
use crate::error::{is_foreign_key_violation, AppError};
use crate::storage::repository::integer_field;
use crate::storage::{DbConnection, Repository};

pub type ContinentService = ResourceService<Continent>;
pub type CountryService = ResourceService<Country>;
pub type CityService = ResourceService<City>;

/// CRUD for one catalog resource, with validation and parent/child integrity checks
pub struct ResourceService<R> {
    repository: Repository<R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<R> ResourceService<R>
where
    R: Resource,
    R::Create: Validate,
    R::Update: Validate,
{
    pub fn new(db: DbConnection) -> Self {
        Self {
            repository: Repository::new(db),
        }
    }

    pub async fn create(&self, input: R::Create) -> Result<R, AppError> {
        info!("Creating {}: {:?}", R::NAME, input);

        ensure_valid(&input)?;
        self.ensure_parent_exists(&input).await?;

        let created = self
            .repository
            .insert(&input)
            .await
            .map_err(|e| Self::reference_error(&input, e))?;
        info!("Created {} with ID: {}", R::NAME, created.id());
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<R>, AppError> {
        let rows = self.repository.find_all().await?;
        info!("Found {} {} records", rows.len(), R::NAME);
        Ok(rows)
    }

    pub async fn find_one(&self, id: i64) -> Result<R, AppError> {
        self.repository
            .find_one(id)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    /// Apply only the supplied fields; an empty update returns the row unchanged
    pub async fn update(&self, id: i64, changes: R::Update) -> Result<R, AppError> {
        info!("Updating {} {}: {:?}", R::NAME, id, changes);

        ensure_valid(&changes)?;
        if !self.repository.exists(id).await? {
            return Err(Self::not_found(id));
        }
        self.ensure_parent_exists(&changes).await?;

        let updated = self
            .repository
            .update(id, &changes)
            .await
            .map_err(|e| Self::reference_error(&changes, e))?
            .ok_or_else(|| Self::not_found(id))?;
        info!("Updated {} {}", R::NAME, id);
        Ok(updated)
    }

    /// Delete the row and return it. Refuses while dependent rows still reference it.
    pub async fn remove(&self, id: i64) -> Result<R, AppError> {
        info!("Deleting {} {}", R::NAME, id);

        if !self.repository.exists(id).await? {
            return Err(Self::not_found(id));
        }

        if let Some(child) = R::CHILD {
            let dependents = self.repository.count_children(id).await?;
            if dependents > 0 {
                warn!(
                    "Refusing to delete {} {}: {} dependent {} record(s)",
                    R::NAME,
                    id,
                    dependents,
                    child.resource
                );
                return Err(AppError::Conflict(format!(
                    "{} {} still has {} dependent {} record(s)",
                    R::NAME,
                    id,
                    dependents,
                    child.resource
                )));
            }
        }

        let deleted = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| Self::not_found(id))?;
        info!("Deleted {} {}", R::NAME, id);
        Ok(deleted)
    }

    /// The parent id carried by `dto`, when present, must name an existing row
    async fn ensure_parent_exists<T: serde::Serialize>(&self, dto: &T) -> Result<(), AppError> {
        let Some(parent) = R::PARENT else {
            return Ok(());
        };
        let Some(parent_id) = integer_field(dto, parent.field) else {
            return Ok(());
        };

        if self.repository.parent_exists(parent, parent_id).await? {
            Ok(())
        } else {
            warn!("{} references missing {} {}", R::NAME, parent.resource, parent_id);
            Err(AppError::InvalidReference {
                resource: parent.resource,
                id: parent_id,
            })
        }
    }

    /// A foreign-key violation on write means the parent vanished after
    /// `ensure_parent_exists` ran; report it the same way.
    fn reference_error<T: serde::Serialize>(dto: &T, error: sqlx::Error) -> AppError {
        if !is_foreign_key_violation(&error) {
            return AppError::Database(error);
        }
        match R::PARENT.and_then(|parent| Some((parent, integer_field(dto, parent.field)?))) {
            Some((parent, parent_id)) => {
                warn!("{} write lost its {} {}", R::NAME, parent.resource, parent_id);
                AppError::InvalidReference {
                    resource: parent.resource,
                    id: parent_id,
                }
            }
            None => AppError::Database(error),
        }
    }

    fn not_found(id: i64) -> AppError {
        warn!("{} {} not found", R::NAME, id);
        AppError::NotFound { resource: R::NAME, id }
    }
}
