use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::token::TokenService;
use crate::utils::error::AppError;

/// The authenticated subject of the request, resolved from the
/// `Authorization: Bearer` header. Rejection is the 401 envelope.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = TokenService::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthenticated("Missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthenticated("Missing bearer token".to_string()))?;

        let subject = tokens.resolve(token)?;
        Ok(CurrentUser(subject))
    }
}
