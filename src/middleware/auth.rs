use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::config;
use crate::error::ApiError;

/// Role required for destructive operations and for seeing soft-deleted rows.
pub const ROLE_SUPER: &str = "super";

/// Caller identity extracted from an optional Bearer token.
///
/// Most routes are readable anonymously, so extraction never rejects a
/// request; a missing or invalid token yields a role-less caller and the
/// role checks below answer false.
#[derive(Clone, Debug, Default)]
pub struct Authorizer {
    claims: Option<Claims>,
}

impl Authorizer {
    pub fn from_request_headers(headers: &HeaderMap) -> Self {
        let claims = extract_jwt_from_headers(headers)
            .ok()
            .and_then(|token| validate_jwt(&token).ok());
        Self { claims }
    }

    /// Role check that defaults to false when no valid credentials are present
    pub fn has_role(&self, role: &str) -> bool {
        self.claims
            .as_ref()
            .map(|claims| claims.roles.iter().any(|r| r == role))
            .unwrap_or(false)
    }

    /// Fails closed with 401 when the caller does not hold the role
    pub fn authorize_to_role(&self, role: &str) -> Result<(), ApiError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ApiError::unauthorized(format!(
                "Missing required role: {}",
                role
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authorizer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_request_headers(&parts.headers))
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
