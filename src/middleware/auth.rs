//! Placeholder admin gate.
//!
//! Not an authentication model: one shared token, compared against the
//! `X-Admin-Token` header or `Authorization: Bearer <token>`. Guards the
//! catalog mutations, order status updates and the dashboard; checkout and
//! the public catalog stay open.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Expected admin token, injected as a router extension.
#[derive(Debug, Clone)]
pub struct AdminToken(Arc<str>);

impl AdminToken {
    /// Wrap the configured token value
    #[must_use]
    pub fn new(token: &str) -> Self {
        Self(Arc::from(token))
    }

    fn matches(&self, candidate: &str) -> bool {
        *self.0 == *candidate
    }
}

/// Rejection for failed admin checks
pub struct AdminRejection {
    status: StatusCode,
    message: &'static str,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Extractor that requires the admin token.
///
/// Accepts the token from `X-Admin-Token` or `Authorization: Bearer`.
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let expected = parts
            .extensions
            .get::<AdminToken>()
            .cloned()
            .ok_or(AdminRejection {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "admin gate not configured",
            })?;

        let headers = &parts.headers;
        let provided = headers
            .get("x-admin-token")
            .and_then(|value| value.to_str().ok())
            .or_else(|| {
                headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .and_then(|value| value.strip_prefix("Bearer "))
            });

        match provided {
            Some(token) if expected.matches(token) => Ok(Self),
            Some(_) => Err(AdminRejection {
                status: StatusCode::UNAUTHORIZED,
                message: "invalid admin token",
            }),
            None => Err(AdminRejection {
                status: StatusCode::UNAUTHORIZED,
                message: "admin token required",
            }),
        }
    }
}
