//! Caller identity extraction
//!
//! Bearer tokens are validated by the gateway in front of this service,
//! which forwards the resolved identity in two headers.

use super::error::Problem;
use crate::contract::{CallerContext, Role};
use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode};
use uuid::Uuid;

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Extractor for the caller context forwarded by the gateway
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub CallerContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let caller_id = header(CALLER_ID_HEADER)
            .ok_or_else(|| unauthenticated(format!("missing {} header", CALLER_ID_HEADER)))?;
        let caller_id = Uuid::parse_str(caller_id)
            .map_err(|_| unauthenticated(format!("{} is not a UUID", CALLER_ID_HEADER)))?;

        let role = header(CALLER_ROLE_HEADER)
            .ok_or_else(|| unauthenticated(format!("missing {} header", CALLER_ROLE_HEADER)))?;
        let role = Role::parse(role)
            .ok_or_else(|| unauthenticated(format!("unknown role '{}'", role)))?;

        Ok(Caller(CallerContext::new(caller_id, role)))
    }
}

fn unauthenticated(detail: String) -> Problem {
    Problem::new(StatusCode::UNAUTHORIZED, "Unauthenticated").with_detail(detail)
}
