use axum::extract::Path;
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::Location;
use crate::database::repositories::{CountryRepository, LocationRepository};
use crate::error::ApiError;
use crate::middleware::{Authorizer, ROLE_SUPER};
use crate::validator::{patch_check, LocationPatchBody};

/// PATCH /api/v1/locations/:id - apply a partial update field by field
pub async fn patch(
    authorizer: Authorizer,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Location>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("Invalid location id."))?;

    if !body.is_object() {
        return Err(ApiError::bad_request("Invalid Body."));
    }
    let body: LocationPatchBody = serde_json::from_value(body)
        .map_err(|err| ApiError::validation_error(vec![err.to_string()]))?;
    patch_check(&body)?;

    let pool = DatabaseManager::pool().await?;
    let locations = LocationRepository::new(pool.clone());
    let countries = CountryRepository::new(pool);

    let mut location = locations
        .get_by_id(id, authorizer.has_role(ROLE_SUPER))
        .await?;

    if let Some(name) = body.name {
        location.name = name;
    }
    if let Some(point) = body.point {
        location.point = Some(point);
    }
    if let Some(metadata) = body.metadata {
        location.metadata = metadata;
    }
    if let Some(street) = body.street {
        location.street = street;
    }
    if let Some(number) = body.number {
        location.number = number;
    }
    if let Some(zipcode) = body.zipcode {
        location.zipcode = zipcode.into_string();
    }
    if let Some(city) = body.city {
        location.city = city;
    }
    if let Some(state) = body.state {
        // Some(None) clears the state
        location.state = state;
    }
    if let Some(country_ref) = body.country {
        let country = countries
            .resolve(country_ref.term())
            .await?
            .ok_or_else(|| ApiError::bad_request("Failed to find country."))?;
        location.country = country;
    }

    locations.save(&mut location).await?;
    Ok(Json(location))
}
