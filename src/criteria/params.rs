use serde::Deserialize;
use serde_json::Value;

use super::criteria::Criteria;
use super::types::SortDirection;
use crate::database::models::Country;

/// Floor and default for the location page size. Requests below the
/// floor are silently raised to it; there is no way to ask for fewer
/// than 20 results.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Raw query parameters recognized by the location list endpoint.
///
/// Everything arrives as strings; malformed values fall back to defaults
/// instead of failing the request. Unrecognized parameters are ignored
/// by deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationListParams {
    pub size: Option<String>,
    pub offset: Option<String>,
    pub name: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub deleted: Option<String>,
}

impl LocationListParams {
    /// Effective page size, clamped to [20, 200]
    pub fn page_size(&self) -> i64 {
        parse_numeric(self.size.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Effective offset, clamped to a minimum of 0
    pub fn page_offset(&self) -> i64 {
        parse_numeric(self.offset.as_deref()).unwrap_or(0).max(0)
    }

    /// The caller asked for soft-deleted rows. Honoring the request still
    /// requires the elevated role; the handler checks that separately.
    pub fn wants_deleted(&self) -> bool {
        self.deleted.as_deref() == Some("true")
    }

    /// Country lookup term, if a non-empty `country` parameter is present
    pub fn country_term(&self) -> Option<&str> {
        self.country.as_deref().filter(|term| !term.is_empty())
    }

    /// Build the query criteria.
    ///
    /// `country` is the pre-resolved country row; passing None drops the
    /// country filter. `include_deleted` must only be true when the
    /// caller's role was already verified.
    pub fn criteria(&self, country: Option<&Country>, include_deleted: bool) -> Criteria {
        let mut criteria = Criteria::new();
        criteria.limit(self.page_size()).offset(self.page_offset());

        // Recognized fields are static identifiers, so the builder calls
        // below cannot fail; a hypothetical failure drops the predicate,
        // which matches the degrade-over-error contract of list queries.
        for (column, value) in self.search_fields() {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                let _ = criteria.contains(column, value);
            }
        }

        if let Some(country) = country {
            let _ = criteria.eq("country", Value::String(country.iso3.clone()));
        }

        if !include_deleted {
            let _ = criteria.is_null("deleted_at");
        }

        let _ = criteria.order_by("name", SortDirection::Asc);
        criteria
    }

    fn search_fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("name", self.name.as_deref()),
            ("street", self.street.as_deref()),
            ("number", self.number.as_deref()),
            ("zipcode", self.zipcode.as_deref()),
            ("city", self.city.as_deref()),
            ("state", self.state.as_deref()),
        ]
    }
}

/// Raw query parameters recognized by the country list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryListParams {
    pub iso3: Option<String>,
    pub name: Option<String>,
}

impl CountryListParams {
    pub fn criteria(&self) -> Criteria {
        let mut criteria = Criteria::new();

        for (column, value) in [
            ("iso3", self.iso3.as_deref()),
            ("name", self.name.as_deref()),
        ] {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                let _ = criteria.contains(column, value);
            }
        }

        let _ = criteria.order_by("iso3", SortDirection::Asc);
        criteria
    }
}

/// Integers and numeric strings are accepted; anything else is None.
/// Fractional strings truncate toward zero.
fn parse_numeric(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().map(|f| f as i64))
}
