pub mod auth;

pub use auth::{Authorizer, ROLE_SUPER};
