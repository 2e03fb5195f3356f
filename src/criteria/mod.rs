pub mod criteria;
pub mod error;
pub mod params;
pub mod types;

pub use criteria::Criteria;
pub use error::CriteriaError;
pub use params::{CountryListParams, LocationListParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use types::*;
