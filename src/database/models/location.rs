use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use super::country::Country;
use crate::types::Point;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub point: Option<Point>,
    pub metadata: Map<String, Value>,
    pub street: String,
    pub number: String,
    pub zipcode: String,
    pub city: String,
    pub state: Option<String>,
    pub country: Country,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Location {
    /// Id and creation timestamp are assigned here and never change
    /// afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        point: Point,
        metadata: Map<String, Value>,
        street: String,
        number: String,
        zipcode: String,
        city: String,
        state: Option<String>,
        country: Country,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            point: Some(point),
            metadata,
            street,
            number,
            zipcode,
            city,
            state,
            country,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Stamped by the repository on every save of a pre-existing row
    pub fn touch_updated(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    /// Stamped by the repository soft-delete operation
    pub fn touch_deleted(&mut self) {
        self.deleted_at = Some(Utc::now());
    }
}

// Rows come from a join against countries; the country name column is
// aliased as country_name.
impl FromRow<'_, PgRow> for Location {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let point: Option<Json<Point>> = row.try_get("point")?;
        let metadata: Option<Json<Map<String, Value>>> = row.try_get("metadata")?;

        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            point: point.map(|p| p.0),
            metadata: metadata.map(|m| m.0).unwrap_or_default(),
            street: row.try_get("street")?,
            number: row.try_get("number")?,
            zipcode: row.try_get("zipcode")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            country: Country {
                iso3: row.try_get("country")?,
                name: row.try_get("country_name")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Location {
        Location::new(
            "Burger Palace".to_string(),
            Point::new(55.6761, 12.5683),
            Map::new(),
            "Main Street".to_string(),
            "42B".to_string(),
            "2100".to_string(),
            "Copenhagen".to_string(),
            None,
            Country {
                iso3: "DNK".to_string(),
                name: "Denmark".to_string(),
            },
        )
    }

    #[test]
    fn new_locations_start_without_lifecycle_timestamps() {
        let location = sample();
        assert!(location.updated_at.is_none());
        assert!(location.deleted_at.is_none());
    }

    #[test]
    fn touch_mutators_stamp_timestamps() {
        let mut location = sample();
        location.touch_updated();
        location.touch_deleted();
        assert!(location.updated_at.is_some());
        assert!(location.deleted_at.is_some());
    }

    #[test]
    fn serializes_with_camel_case_timestamps_and_nested_country() {
        let location = sample();
        let value = serde_json::to_value(&location).unwrap();

        assert!(value.get("createdAt").is_some());
        assert_eq!(value["updatedAt"], json!(null));
        assert_eq!(value["deletedAt"], json!(null));
        assert_eq!(value["country"], json!({"iso3": "DNK", "name": "Denmark"}));
        assert_eq!(value["point"]["latitude"], json!(55.6761));
        assert_eq!(value["state"], json!(null));
        // snake_case leakage would break API clients
        assert!(value.get("created_at").is_none());
    }
}
