use axum::extract::Path;
use axum::Json;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Location;
use crate::database::repositories::LocationRepository;
use crate::error::ApiError;
use crate::middleware::{Authorizer, ROLE_SUPER};

/// GET /api/v1/locations/:id - fetch a single location. Callers holding
/// the elevated role also see soft-deleted rows.
pub async fn get(
    authorizer: Authorizer,
    Path(id): Path<String>,
) -> Result<Json<Location>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid location id."))?;

    let pool = DatabaseManager::pool().await?;
    let repository = LocationRepository::new(pool);

    let location = repository
        .get_by_id(id, authorizer.has_role(ROLE_SUPER))
        .await?;
    Ok(Json(location))
}
