use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::users::store::StoreError;

/// Service-wide error taxonomy. The HTTP layer derives status codes from
/// the variant, never from message text.
#[derive(Debug, Error)]
pub enum AppError {
    /// User-correctable field problems. Raised before any crypto or
    /// storage call is made.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    /// Missing, malformed or expired token. Carries no internal detail.
    #[error("Forbidden")]
    Forbidden,

    /// Shared by unknown-phone and wrong-password so the response cannot
    /// be used to enumerate accounts.
    #[error("Invalid phone number or password.")]
    InvalidCredentials,

    /// Phone number uniqueness violation.
    #[error("Phone number already registered. Please use another phone number.")]
    Conflict,

    /// Storage or cryptographic failure; opaque to the caller.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// A presence failure: required fields were not supplied at all.
    pub fn missing(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// A content failure with itemized per-field messages.
    pub fn invalid_fields(details: Vec<String>) -> Self {
        Self::Validation {
            message: "Invalid Request. Please meet the criteria".into(),
            details,
        }
    }

    /// A content failure for a single field, messages joined into one line.
    pub fn joined(messages: Vec<String>) -> Self {
        Self::Validation {
            message: messages.join(" & "),
            details: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_messages: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Validation { message, details } => ErrorBody {
                message,
                error_messages: if details.is_empty() {
                    None
                } else {
                    Some(details)
                },
            },
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                ErrorBody {
                    message: "Internal server error.".into(),
                    error_messages: None,
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                error_messages: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => AppError::Conflict,
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}
