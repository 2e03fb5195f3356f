use axum::extract::Query;
use axum::Json;

use crate::criteria::LocationListParams;
use crate::database::manager::DatabaseManager;
use crate::database::models::Location;
use crate::database::repositories::{CountryRepository, LocationRepository};
use crate::error::ApiError;
use crate::middleware::{Authorizer, ROLE_SUPER};

/// GET /api/v1/locations - list locations matching the query filters.
/// Filtering problems never fail the request; they degrade to default or
/// empty results.
pub async fn list(
    authorizer: Authorizer,
    Query(params): Query<LocationListParams>,
) -> Result<Json<Vec<Location>>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let locations = LocationRepository::new(pool.clone());
    let countries = CountryRepository::new(pool);

    // Unresolvable country terms drop the filter instead of erroring
    let country = match params.country_term() {
        Some(term) => countries.resolve(term).await.unwrap_or_else(|err| {
            tracing::warn!("country filter lookup failed: {}", err);
            None
        }),
        None => None,
    };

    let include_deleted = params.wants_deleted() && authorizer.has_role(ROLE_SUPER);
    let criteria = params.criteria(country.as_ref(), include_deleted);

    Ok(Json(locations.get_list(&criteria).await))
}
