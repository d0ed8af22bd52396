use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

use db::error::DomainError;

/// Standard response envelope for all outgoing JSON:
/// `{ "success": bool, "data": T, "message": string }`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error envelope with default `data`; error responses carry no useful
    /// payload.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Maps a domain error onto its HTTP status and envelope. Infrastructure
/// errors are logged here and answered with a generic message.
pub fn from_domain_error<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize + Default,
{
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::QuotaExceeded(_) => StatusCode::FORBIDDEN,
        DomainError::InvalidState(_) => StatusCode::BAD_REQUEST,
        DomainError::Db(e) => {
            tracing::error!(error = %e, "database error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Internal server error")),
            );
        }
    };
    (status, Json(ApiResponse::error(err.to_string())))
}
