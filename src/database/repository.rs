use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{CategoryRecord, ProfileRecord, SectorRecord};
use crate::draft::{SaveError, SectorSavePayload, SectorSaver};

/// Reads and writes sector rows and their categories.
pub struct SectorRepository {
    pool: PgPool,
}

impl SectorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn from_manager() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    /// All sectors, newest first.
    pub async fn list(&self) -> Result<Vec<SectorRecord>, DatabaseError> {
        let sectors = sqlx::query_as::<_, SectorRecord>(
            "SELECT id, name, description, platforms, prompt_template, created_at, updated_at
             FROM sectors ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sectors)
    }

    /// One sector and its categories, fetched concurrently. Categories come
    /// back in insertion order, which is the order the editor preserves.
    pub async fn fetch(
        &self,
        id: Uuid,
    ) -> Result<(SectorRecord, Vec<CategoryRecord>), DatabaseError> {
        let sector_query = sqlx::query_as::<_, SectorRecord>(
            "SELECT id, name, description, platforms, prompt_template, created_at, updated_at
             FROM sectors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool);

        let categories_query = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, sector_id, name, created_at
             FROM sector_categories WHERE sector_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&self.pool);

        let (sector, categories) = futures::try_join!(sector_query, categories_query)?;
        let sector = sector.ok_or_else(|| DatabaseError::NotFound(format!("sector {}", id)))?;
        Ok((sector, categories))
    }

    /// Persist a normalized save payload in one transaction. The payload's
    /// category list is the complete desired set: rows missing from it are
    /// deleted, rows carrying an id are renamed, the rest are inserted.
    pub async fn save(&self, payload: &SectorSavePayload) -> Result<Uuid, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sector_id = match payload.sector_id {
            Some(id) => {
                let updated = sqlx::query(
                    "UPDATE sectors
                     SET name = $2, description = $3, platforms = $4, prompt_template = $5,
                         updated_at = now()
                     WHERE id = $1",
                )
                .bind(id)
                .bind(&payload.name)
                .bind(&payload.description)
                .bind(&payload.platforms)
                .bind(&payload.prompt_template)
                .execute(&mut *tx)
                .await?;

                if updated.rows_affected() == 0 {
                    return Err(DatabaseError::NotFound(format!("sector {}", id)));
                }
                id
            }
            None => {
                let (id,): (Uuid,) = sqlx::query_as(
                    "INSERT INTO sectors (name, description, platforms, prompt_template)
                     VALUES ($1, $2, $3, $4) RETURNING id",
                )
                .bind(&payload.name)
                .bind(&payload.description)
                .bind(&payload.platforms)
                .bind(&payload.prompt_template)
                .fetch_one(&mut *tx)
                .await?;
                id
            }
        };

        let keep_ids: Vec<Uuid> = payload.categories.iter().filter_map(|c| c.id).collect();
        sqlx::query("DELETE FROM sector_categories WHERE sector_id = $1 AND NOT (id = ANY($2))")
            .bind(sector_id)
            .bind(&keep_ids)
            .execute(&mut *tx)
            .await?;

        for category in &payload.categories {
            match category.id {
                Some(category_id) => {
                    sqlx::query(
                        "UPDATE sector_categories SET name = $3
                         WHERE id = $1 AND sector_id = $2",
                    )
                    .bind(category_id)
                    .bind(sector_id)
                    .bind(&category.name)
                    .execute(&mut *tx)
                    .await?;
                }
                None => {
                    sqlx::query(
                        "INSERT INTO sector_categories (sector_id, name) VALUES ($1, $2)",
                    )
                    .bind(sector_id)
                    .bind(&category.name)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        tracing::info!(%sector_id, categories = payload.categories.len(), "sector persisted");
        Ok(sector_id)
    }
}

#[async_trait]
impl SectorSaver for SectorRepository {
    async fn save_sector(&self, payload: &SectorSavePayload) -> Result<(), SaveError> {
        self.save(payload).await.map(|_| ()).map_err(|e| SaveError(e.to_string()))
    }
}

/// Reads and writes operator profiles.
pub struct ProfileRepository {
    pool: PgPool,
}

/// Editable profile fields.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn from_manager() -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::pool().await?))
    }

    /// Create the profile row on first sign-in; later sign-ins are no-ops.
    pub async fn ensure(&self, user_id: Uuid, email: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO profiles (id, email, role) VALUES ($1, $2, 'operator')
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(user_id)
        .bind(email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn fetch(&self, user_id: Uuid) -> Result<ProfileRecord, DatabaseError> {
        sqlx::query_as::<_, ProfileRecord>(
            "SELECT id, email, full_name, role, created_at, updated_at
             FROM profiles WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("profile {}", user_id)))
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<ProfileRecord, DatabaseError> {
        let full_name = changes
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        sqlx::query_as::<_, ProfileRecord>(
            "UPDATE profiles SET full_name = $2, updated_at = now()
             WHERE id = $1
             RETURNING id, email, full_name, role, created_at, updated_at",
        )
        .bind(user_id)
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("profile {}", user_id)))
    }
}
