use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::services::{AuthError, CatalogError, ImageError, InventoryError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    DuplicateEmail,

    InvalidCredentials,

    Unauthorized(String),

    Forbidden(String),

    InvalidQuantity(String),

    InsufficientStock { available: i64 },

    InvalidFileType(String),

    PayloadTooLarge(String),

    UploadFailed(String),

    ServiceUnavailable(String),

    InternalError(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<i64>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::DuplicateEmail => write!(f, "User already exists"),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::InvalidQuantity(msg) => write!(f, "Invalid quantity: {}", msg),
            ApiError::InsufficientStock { available } => {
                write!(f, "Insufficient stock: {} available", available)
            }
            ApiError::InvalidFileType(msg) => write!(f, "Invalid file type: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::UploadFailed(msg) => write!(f, "Upload failed: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    const fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::DatabaseError(_) => "DatabaseError",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::DuplicateEmail => "DuplicateEmail",
            ApiError::InvalidCredentials => "InvalidCredentials",
            ApiError::Unauthorized(_) => "Unauthenticated",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::InvalidQuantity(_) => "InvalidQuantity",
            ApiError::InsufficientStock { .. } => "InsufficientStock",
            ApiError::InvalidFileType(_) => "InvalidFileType",
            ApiError::PayloadTooLarge(_) => "PayloadTooLarge",
            ApiError::UploadFailed(_) => "UploadFailed",
            ApiError::ServiceUnavailable(_) => "ServiceUnavailable",
            ApiError::InternalError(_) => "InternalError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::DuplicateEmail => (StatusCode::BAD_REQUEST, "User already exists".to_string()),
            ApiError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "Invalid credentials".to_string())
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::InvalidQuantity(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InsufficientStock { available } => (
                StatusCode::BAD_REQUEST,
                format!("Insufficient stock. Only {} left", available),
            ),
            ApiError::InvalidFileType(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            ApiError::UploadFailed(msg) => {
                tracing::error!("Image upload failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image upload failed".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, msg.clone())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let available = match &self {
            ApiError::InsufficientStock { available } => Some(*available),
            _ => None,
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
            available,
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => ApiError::DuplicateEmail,
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidFileType(_) => ApiError::InvalidFileType(err.to_string()),
            ImageError::TooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            ImageError::UploadFailed(msg) => ApiError::UploadFailed(msg),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ApiError::not_found("Sweet", id),
            CatalogError::Validation(msg) => ApiError::ValidationError(msg),
            CatalogError::Image(e) => e.into(),
            CatalogError::Database(msg) => ApiError::DatabaseError(msg),
            CatalogError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => ApiError::not_found("Sweet", id),
            InventoryError::InvalidQuantity(_) => ApiError::InvalidQuantity(err.to_string()),
            InventoryError::InsufficientStock { available } => {
                ApiError::InsufficientStock { available }
            }
            InventoryError::StockLimit { .. } => ApiError::ValidationError(err.to_string()),
            InventoryError::Database(msg) => ApiError::DatabaseError(msg),
            InventoryError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        ApiError::InvalidQuantity(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
