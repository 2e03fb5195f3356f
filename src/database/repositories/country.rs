use sqlx::PgPool;
use tracing::error;

use super::{bind_value, RepositoryError};
use crate::criteria::Criteria;
use crate::database::models::Country;

const SELECT_BASE: &str = "SELECT iso3, name FROM countries";

pub struct CountryRepository {
    pool: PgPool,
}

impl CountryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_iso3(&self, iso3: &str) -> Result<Country, RepositoryError> {
        let row = sqlx::query_as::<_, Country>(
            "SELECT iso3, name FROM countries WHERE iso3 = $1",
        )
        .bind(iso3)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            RepositoryError::NotFound(format!("Failed to find a country by iso3 \"{}\".", iso3))
        })
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Country, RepositoryError> {
        let row = sqlx::query_as::<_, Country>(
            "SELECT iso3, name FROM countries WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            RepositoryError::NotFound(format!("Failed to find a country by name \"{}\".", name))
        })
    }

    /// Lookup by iso3 first, then by name; unresolvable terms yield None
    pub async fn resolve(&self, term: &str) -> Result<Option<Country>, RepositoryError> {
        match self.get_by_iso3(term).await {
            Ok(country) => Ok(Some(country)),
            Err(RepositoryError::NotFound(_)) => match self.get_by_name(term).await {
                Ok(country) => Ok(Some(country)),
                Err(RepositoryError::NotFound(_)) => Ok(None),
                Err(other) => Err(other),
            },
            Err(other) => Err(other),
        }
    }

    /// Execute a criteria query. Failures degrade to an empty list so the
    /// list endpoints stay available.
    pub async fn get_list(&self, criteria: &Criteria) -> Vec<Country> {
        let fragment = criteria.to_sql_suffix(None, 0);
        let sql = format!("{} {}", SELECT_BASE, fragment.sql);

        let mut query = sqlx::query_as::<_, Country>(&sql);
        for param in &fragment.params {
            query = bind_value(query, param);
        }

        match query.fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("country list query failed: {}", err);
                Vec::new()
            }
        }
    }
}
