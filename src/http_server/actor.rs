//! Actor extraction
//!
//! Identity is resolved upstream (chat platform, SSO proxy) and forwarded in
//! `x-actor-id`, `x-actor-name` and `x-actor-role`. Capabilities come from the
//! role; handlers never look at the raw headers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::program::{Actor, Role};

use super::response::ErrorResponse;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Actor resolved from request headers
#[derive(Debug, Clone)]
pub struct RequestActor(pub Actor);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestActor
where
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)
            .ok_or_else(|| ErrorResponse::new(401, "Missing x-actor-id header"))?;
        let role: Role = header(parts, ACTOR_ROLE_HEADER)
            .ok_or_else(|| ErrorResponse::new(401, "Missing x-actor-role header"))?
            .parse()
            .map_err(|e: String| ErrorResponse::new(401, e))?;
        let name = header(parts, ACTOR_NAME_HEADER).unwrap_or(id);

        Ok(RequestActor(Actor::resolve(id, name, role)))
    }
}
