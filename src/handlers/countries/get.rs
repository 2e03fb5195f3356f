use axum::extract::Path;
use axum::Json;

use crate::database::manager::DatabaseManager;
use crate::database::models::Country;
use crate::database::repositories::CountryRepository;
use crate::error::ApiError;

/// GET /api/v1/countries/:iso3 - fetch a single country
pub async fn get(Path(iso3): Path<String>) -> Result<Json<Country>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let repository = CountryRepository::new(pool);

    let country = repository.get_by_iso3(&iso3).await?;
    Ok(Json(country))
}
