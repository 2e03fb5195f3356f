use axum::Json;
use serde_json::Value;

use crate::database::manager::DatabaseManager;
use crate::database::models::Location;
use crate::database::repositories::{CountryRepository, LocationRepository};
use crate::error::ApiError;
use crate::middleware::{Authorizer, ROLE_SUPER};
use crate::validator::{post_check, LocationPostBody};

/// POST /api/v1/locations - create a location. Requires the elevated
/// role. Answers 200 with the created entity.
pub async fn post(
    authorizer: Authorizer,
    Json(body): Json<Value>,
) -> Result<Json<Location>, ApiError> {
    authorizer.authorize_to_role(ROLE_SUPER)?;

    if !body.is_object() {
        return Err(ApiError::bad_request("Invalid body."));
    }
    let body: LocationPostBody = serde_json::from_value(body)
        .map_err(|err| ApiError::validation_error(vec![err.to_string()]))?;
    post_check(&body)?;

    let pool = DatabaseManager::pool().await?;
    let locations = LocationRepository::new(pool.clone());
    let countries = CountryRepository::new(pool);

    if !locations.is_name_unique(&body.name).await? {
        return Err(ApiError::bad_request("name already exists."));
    }

    let country = countries
        .resolve(body.country.term())
        .await?
        .ok_or_else(|| ApiError::bad_request("Invalid Country"))?;

    let mut location = Location::new(
        body.name,
        body.point,
        body.metadata,
        body.street,
        body.number,
        body.zipcode.into_string(),
        body.city,
        body.state,
        country,
    );
    locations.save(&mut location).await?;

    Ok(Json(location))
}
