use axum::extract::Query;
use axum::Json;

use crate::criteria::CountryListParams;
use crate::database::manager::DatabaseManager;
use crate::database::models::Country;
use crate::database::repositories::CountryRepository;
use crate::error::ApiError;

/// GET /api/v1/countries - list countries matching the query filters
pub async fn list(
    Query(params): Query<CountryListParams>,
) -> Result<Json<Vec<Country>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let repository = CountryRepository::new(pool);

    Ok(Json(repository.get_list(&params.criteria()).await))
}
