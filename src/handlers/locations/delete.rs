use axum::extract::{Path, Query};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::repositories::{LocationRepository, RepositoryError};
use crate::error::ApiError;
use crate::middleware::{Authorizer, ROLE_SUPER};

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub hard: Option<String>,
}

/// DELETE /api/v1/locations/:id - soft delete by default, `?hard=true`
/// removes the row. Requires the elevated role.
pub async fn delete(
    authorizer: Authorizer,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    authorizer.authorize_to_role(ROLE_SUPER)?;

    // An unparseable id can never match a row, so it gets the same
    // answer as a missing one.
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::gone("Entity is gone."))?;

    let pool = DatabaseManager::pool().await?;
    let repository = LocationRepository::new(pool);

    let hard = query.hard.as_deref() == Some("true");
    let result = if hard {
        // Hard deletes also remove rows that were already soft-deleted
        match repository.get_by_id(id, true).await {
            Ok(mut location) => repository.delete(&mut location, true).await,
            Err(err) => Err(err),
        }
    } else {
        // Default lookups exclude deleted rows; a second soft delete of
        // the same id lands in the NotFound arm below.
        match repository.get_by_id(id, false).await {
            Ok(mut location) => repository.delete(&mut location, false).await,
            Err(err) => Err(err),
        }
    };

    match result {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(RepositoryError::NotFound(_)) => Err(ApiError::gone("Entity is gone.")),
        Err(other) => Err(other.into()),
    }
}
