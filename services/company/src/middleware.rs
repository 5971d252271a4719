//! Bearer token extraction

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use std::convert::Infallible;

/// Token from an `Authorization: Bearer` header.
///
/// A missing or malformed header yields an empty token instead of a
/// rejection, so the service answers it like any other invalid token.
#[derive(Debug, Clone, Default)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
            .unwrap_or_default();

        Ok(BearerToken(token))
    }
}
