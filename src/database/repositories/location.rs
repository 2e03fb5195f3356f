use sqlx::types::Json;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::{bind_value, RepositoryError};
use crate::criteria::Criteria;
use crate::database::models::Location;

/// Columns for hydrating a Location, with the owning country joined in
const SELECT_BASE: &str = "SELECT l.id, l.name, l.point, l.metadata, l.street, l.number, \
     l.zipcode, l.city, l.state, l.country, c.name AS country_name, \
     l.created_at, l.updated_at, l.deleted_at \
     FROM locations l JOIN countries c ON c.iso3 = l.country";

pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch one location by id. Soft-deleted rows only match when
    /// `include_deleted` is set.
    pub async fn get_by_id(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Location, RepositoryError> {
        let mut sql = format!("{} WHERE l.id = $1", SELECT_BASE);
        if !include_deleted {
            sql.push_str(" AND l.deleted_at IS NULL");
        }

        let row = sqlx::query_as::<_, Location>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or_else(|| {
            RepositoryError::NotFound(format!("Failed to find a location by id \"{}\".", id))
        })
    }

    pub async fn id_exists(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<bool, RepositoryError> {
        match self.get_by_id(id, include_deleted).await {
            Ok(_) => Ok(true),
            Err(RepositoryError::NotFound(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Name uniqueness spans soft-deleted rows, matching the unique index
    pub async fn is_name_unique(&self, name: &str) -> Result<bool, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM locations WHERE name = $1")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count == 0)
    }

    /// Persist a location. Pre-existing rows (soft-deleted included) get
    /// their `updated_at` stamped before the write.
    pub async fn save(&self, location: &mut Location) -> Result<(), RepositoryError> {
        if self
            .id_exists(location.id, true)
            .await
            .map_err(save_failed)?
        {
            location.touch_updated();
        }
        self.persist(location).await.map_err(save_failed)
    }

    async fn persist(&self, location: &Location) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO locations \
             (id, name, point, metadata, street, number, zipcode, city, state, country, \
              created_at, updated_at, deleted_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             ON CONFLICT (id) DO UPDATE SET \
             name = EXCLUDED.name, point = EXCLUDED.point, metadata = EXCLUDED.metadata, \
             street = EXCLUDED.street, number = EXCLUDED.number, zipcode = EXCLUDED.zipcode, \
             city = EXCLUDED.city, state = EXCLUDED.state, country = EXCLUDED.country, \
             updated_at = EXCLUDED.updated_at, deleted_at = EXCLUDED.deleted_at",
        )
        .bind(location.id)
        .bind(&location.name)
        .bind(location.point.map(Json))
        .bind(Json(location.metadata.clone()))
        .bind(&location.street)
        .bind(&location.number)
        .bind(&location.zipcode)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.country.iso3)
        .bind(location.created_at)
        .bind(location.updated_at)
        .bind(location.deleted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a location. `hard` drops the row; otherwise `deleted_at`
    /// is stamped and persisted.
    pub async fn delete(
        &self,
        location: &mut Location,
        hard: bool,
    ) -> Result<(), RepositoryError> {
        if hard {
            sqlx::query("DELETE FROM locations WHERE id = $1")
                .bind(location.id)
                .execute(&self.pool)
                .await
                .map_err(|source| RepositoryError::Delete {
                    entity: "location",
                    source,
                })?;
            return Ok(());
        }

        location.touch_deleted();
        sqlx::query("UPDATE locations SET deleted_at = $2 WHERE id = $1")
            .bind(location.id)
            .bind(location.deleted_at)
            .execute(&self.pool)
            .await
            .map_err(|source| RepositoryError::Delete {
                entity: "location",
                source,
            })?;
        Ok(())
    }

    /// Execute a criteria query. Failures degrade to an empty list so the
    /// list endpoints stay available.
    pub async fn get_list(&self, criteria: &Criteria) -> Vec<Location> {
        let fragment = criteria.to_sql_suffix(Some("l"), 0);
        let sql = format!("{} {}", SELECT_BASE, fragment.sql);

        let mut query = sqlx::query_as::<_, Location>(&sql);
        for param in &fragment.params {
            query = bind_value(query, param);
        }

        match query.fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("location list query failed: {}", err);
                Vec::new()
            }
        }
    }
}

fn save_failed(err: RepositoryError) -> RepositoryError {
    match err {
        RepositoryError::Sqlx(source) => RepositoryError::Save {
            entity: "location",
            source,
        },
        other => other,
    }
}
