pub mod country;
pub mod location;

pub use country::CountryRepository;
pub use location::LocationRepository;

use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::FromRow;
use thiserror::Error;

/// Errors surfaced by the entity repositories
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("No such entity: {0}")]
    NotFound(String),

    #[error("Failed to save {entity}")]
    Save {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to delete {entity}")]
    Delete {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Bind a criteria parameter to a query. Criteria values are JSON values
/// so list predicates and repository code share one representation.
pub(crate) fn bind_value<'q, O>(
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    value: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match value {
        Value::Null => {
            let none: Option<String> = None;
            query.bind(none)
        }
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        Value::String(s) => query.bind(s),
        other => query.bind(other.clone()), // JSONB
    }
}
