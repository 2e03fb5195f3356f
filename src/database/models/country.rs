use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference/lookup row; countries are not created through this API.
/// The locations that point at a country are reachable through
/// `LocationRepository` with a country predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Country {
    pub iso3: String,
    pub name: String,
}
