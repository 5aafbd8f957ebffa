//! Caller identity as asserted by the upstream authentication gateway.
//!
//! Tokens are verified before requests reach this service; the gateway forwards the
//! authenticated user id and role in `x-user-id` / `x-user-role`. Handlers only check
//! that the role fits the route.

use std::fmt;
use std::str::FromStr;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::domain::StudentId;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Student,
    Industry,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Industry => "industry",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "industry" => Ok(Role::Industry),
            "admin" => Ok(Role::Admin),
            other => Err(AuthError::UnknownRole(other.to_string())),
        }
    }
}

/// Authenticated caller attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn require(&self, role: Role) -> Result<(), AuthError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AuthError::Forbidden(self.role))
        }
    }

    /// Student id of the caller; only meaningful for student callers.
    pub fn student_id(&self) -> StudentId {
        StudentId(self.user_id.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER)?;
        let role = header_value(parts, USER_ROLE_HEADER)?.parse()?;
        Ok(Caller { user_id, role })
    }
}

fn header_value(parts: &Parts, name: &'static str) -> Result<String, AuthError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or(AuthError::MissingIdentity(name))
}

/// Identity or role failures surfaced before the handler runs.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authorized, missing {0} header")]
    MissingIdentity(&'static str),
    #[error("Not authorized, unknown role '{0}'")]
    UnknownRole(String),
    #[error("Forbidden: {0} is not authorized to access this route")]
    Forbidden(Role),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingIdentity(_) | AuthError::UnknownRole(_) => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
