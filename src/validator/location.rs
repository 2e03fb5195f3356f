use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use validator::Validate;

use super::error_messages;
use crate::error::ApiError;
use crate::types::Point;

/// `country` arrives either as a lookup term (iso3 or name) or as an
/// embedded country object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountryRef {
    Term(String),
    Embedded { iso3: String, name: String },
}

impl CountryRef {
    /// The lookup term handed to the country repository
    pub fn term(&self) -> &str {
        match self {
            CountryRef::Term(term) => term,
            CountryRef::Embedded { iso3, .. } => iso3,
        }
    }

    fn check(&self, messages: &mut Vec<String>) {
        let valid = match self {
            CountryRef::Term(term) => !term.is_empty(),
            CountryRef::Embedded { iso3, name } => !iso3.is_empty() && !name.is_empty(),
        };
        if !valid {
            messages.push("country must be a non-empty string or an iso3/name object".to_string());
        }
    }
}

/// `zipcode` is a string in storage but clients may send an integer
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Zipcode {
    Text(String),
    Number(i64),
}

impl Zipcode {
    pub fn into_string(self) -> String {
        match self {
            Zipcode::Text(text) => text,
            Zipcode::Number(number) => number.to_string(),
        }
    }

    fn check(&self, messages: &mut Vec<String>) {
        if let Zipcode::Text(text) = self {
            if text.is_empty() || text.chars().count() > 10 {
                messages.push("zipcode must be between 1 and 10 characters".to_string());
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocationPostBody {
    #[validate(length(min = 4, max = 200, message = "name must be between 4 and 200 characters"))]
    pub name: String,
    pub point: Point,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[validate(length(min = 2, max = 254, message = "street must be between 2 and 254 characters"))]
    pub street: String,
    #[validate(length(min = 1, max = 20, message = "number must be between 1 and 20 characters"))]
    pub number: String,
    pub zipcode: Zipcode,
    #[validate(length(min = 2, max = 100, message = "city must be between 2 and 100 characters"))]
    pub city: String,
    #[validate(length(min = 2, max = 254, message = "state must be between 2 and 254 characters"))]
    pub state: Option<String>,
    pub country: CountryRef,
}

/// Shape check for POST bodies; one message per violated rule
pub fn post_check(body: &LocationPostBody) -> Result<(), ApiError> {
    let mut messages = match body.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => error_messages(&errors),
    };
    body.zipcode.check(&mut messages);
    body.country.check(&mut messages);

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(messages))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LocationPatchBody {
    #[validate(length(min = 4, max = 200, message = "name must be between 4 and 200 characters"))]
    pub name: Option<String>,
    pub point: Option<Point>,
    pub metadata: Option<Map<String, Value>>,
    #[validate(length(min = 2, max = 254, message = "street must be between 2 and 254 characters"))]
    pub street: Option<String>,
    #[validate(length(min = 1, max = 20, message = "number must be between 1 and 20 characters"))]
    pub number: Option<String>,
    pub zipcode: Option<Zipcode>,
    #[validate(length(min = 2, max = 100, message = "city must be between 2 and 100 characters"))]
    pub city: Option<String>,
    /// Distinguishes an absent `state` from an explicit null
    #[serde(default, deserialize_with = "double_option")]
    pub state: Option<Option<String>>,
    pub country: Option<CountryRef>,
}

impl LocationPatchBody {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.point.is_none()
            && self.metadata.is_none()
            && self.street.is_none()
            && self.number.is_none()
            && self.zipcode.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }
}

/// Shape check for PATCH bodies: at least one recognized field, each
/// individually well-formed when present
pub fn patch_check(body: &LocationPatchBody) -> Result<(), ApiError> {
    if body.is_empty() {
        return Err(ApiError::validation_error(vec![
            "at least one updatable field is required".to_string(),
        ]));
    }

    let mut messages = match body.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => error_messages(&errors),
    };
    if let Some(zipcode) = &body.zipcode {
        zipcode.check(&mut messages);
    }
    if let Some(country) = &body.country {
        country.check(&mut messages);
    }
    if let Some(Some(state)) = &body.state {
        let length = state.chars().count();
        if !(2..=254).contains(&length) {
            messages.push("state must be between 2 and 254 characters".to_string());
        }
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(messages))
    }
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_post_body() -> Value {
        json!({
            "name": "Burger Palace",
            "point": {"latitude": 55.6761, "longitude": 12.5683},
            "metadata": {"phone": "+45 11 22 33 44"},
            "street": "Main Street",
            "number": "42B",
            "zipcode": "2100",
            "city": "Copenhagen",
            "country": "DNK"
        })
    }

    #[test]
    fn accepts_a_complete_post_body() {
        let body: LocationPostBody = serde_json::from_value(valid_post_body()).unwrap();
        assert!(post_check(&body).is_ok());
        assert_eq!(body.country.term(), "DNK");
    }

    #[test]
    fn accepts_integer_zipcode_and_embedded_country() {
        let mut value = valid_post_body();
        value["zipcode"] = json!(2100);
        value["country"] = json!({"iso3": "DNK", "name": "Denmark"});

        let body: LocationPostBody = serde_json::from_value(value).unwrap();
        assert!(post_check(&body).is_ok());
        assert_eq!(body.zipcode.clone().into_string(), "2100");
        assert_eq!(body.country.term(), "DNK");
    }

    #[test]
    fn rejects_short_name_with_a_message_per_rule() {
        let mut value = valid_post_body();
        value["name"] = json!("abc");
        value["city"] = json!("x");

        let body: LocationPostBody = serde_json::from_value(value).unwrap();
        let err = post_check(&body).unwrap_err();
        let messages = match err {
            ApiError::ValidationError(messages) => messages,
            other => panic!("expected validation error, got {:?}", other),
        };
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("name")));
        assert!(messages.iter().any(|m| m.contains("city")));
    }

    #[test]
    fn rejects_oversized_zipcode_string() {
        let mut value = valid_post_body();
        value["zipcode"] = json!("12345678901");

        let body: LocationPostBody = serde_json::from_value(value).unwrap();
        assert!(post_check(&body).is_err());
    }

    #[test]
    fn rejects_missing_required_field_at_deserialization() {
        let mut value = valid_post_body();
        value.as_object_mut().unwrap().remove("street");
        let result: Result<LocationPostBody, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn patch_requires_at_least_one_recognized_field() {
        let body: LocationPatchBody = serde_json::from_value(json!({})).unwrap();
        assert!(patch_check(&body).is_err());
    }

    #[test]
    fn patch_distinguishes_null_state_from_absent_state() {
        let body: LocationPatchBody = serde_json::from_value(json!({"state": null})).unwrap();
        assert_eq!(body.state, Some(None));
        assert!(patch_check(&body).is_ok());

        let body: LocationPatchBody = serde_json::from_value(json!({"name": "New Name"})).unwrap();
        assert_eq!(body.state, None);
        assert!(patch_check(&body).is_ok());
    }

    #[test]
    fn patch_validates_present_fields() {
        let body: LocationPatchBody =
            serde_json::from_value(json!({"name": "abc"})).unwrap();
        assert!(patch_check(&body).is_err());

        let body: LocationPatchBody =
            serde_json::from_value(json!({"state": "x"})).unwrap();
        assert!(patch_check(&body).is_err());
    }
}
