use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::ApiError;

/// Explicit caller context passed into every core operation.
///
/// Authentication and tenant resolution happen upstream (gateway or hosting
/// environment); this layer only trusts the forwarded headers. Keeping the
/// context explicit rather than ambient keeps the core testable in
/// isolation.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub tenant_id: Uuid,
    pub actor_id: Uuid,
}

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const ACTOR_HEADER: &str = "x-actor-id";

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, ApiError> {
    let raw = parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::BadRequest(format!("Missing {} header", name)))?
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} header", name)))?;
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {} header", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext {
            tenant_id: header_uuid(parts, TENANT_HEADER)?,
            actor_id: header_uuid(parts, ACTOR_HEADER)?,
        })
    }
}
