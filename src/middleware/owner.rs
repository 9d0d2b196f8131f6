//! Resolución del owner de la sesión
//!
//! La autenticación vive fuera de este servicio: acá se confía en el header
//! `X-Owner-Id` que inyecta el gateway ya autenticado. Sin header se usa el
//! owner de demo para desarrollo local.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::utils::errors::AppError;

/// Owner de demo para desarrollo local sin gateway
const DEMO_OWNER_ID: &str = "6b8f4a2e-0f3d-4c57-9a1e-2d7c5b9e8a01";

/// Owner autenticado de la request
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedOwner {
    pub owner_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get("x-owner-id") {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| AppError::BadRequest("Invalid X-Owner-Id header".to_string()))?;
                let owner_id = Uuid::parse_str(raw).map_err(|_| {
                    AppError::BadRequest("X-Owner-Id must be a valid UUID".to_string())
                })?;
                Ok(AuthenticatedOwner { owner_id })
            }
            None => Ok(AuthenticatedOwner {
                // Fallback de desarrollo; en producción el gateway siempre
                // manda el header
                owner_id: Uuid::parse_str(DEMO_OWNER_ID)
                    .map_err(|_| AppError::Internal("Invalid demo owner id".to_string()))?,
            }),
        }
    }
}
