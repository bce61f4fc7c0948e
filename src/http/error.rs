//! API errors with a fixed mapping to HTTP status codes.
//!
//! The mapping is the same for every endpoint. Internal failures are logged
//! and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::{ErrorKind, LedgerError};

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Failure reported by validation or the ledger
    Ledger(LedgerError),

    /// Body is not valid JSON for the endpoint
    MalformedBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(err) => status_for(err.kind()),
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorResponse {
        let (code, message) = match self {
            Self::MalformedBody(_) => (Some("BAD_REQUEST"), "invalid request body"),
            Self::Ledger(err) => match err.kind() {
                ErrorKind::WalletNotFound => (Some("NOT_FOUND"), "wallet not found"),
                ErrorKind::InsufficientFunds => (Some("CONFLICT"), "insufficient funds"),
                ErrorKind::InvalidOperationType => (Some("BAD_REQUEST"), "invalid operation type"),
                ErrorKind::OperationTypeNotSpecified => {
                    (Some("BAD_REQUEST"), "operation type not specified")
                }
                ErrorKind::InvalidAmount => (Some("BAD_REQUEST"), "invalid amount"),
                ErrorKind::InvalidWalletId => (Some("BAD_REQUEST"), "invalid wallet id"),
                ErrorKind::Internal => (None, "internal server error"),
            },
        };
        ErrorResponse {
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::WalletNotFound => StatusCode::NOT_FOUND,
        ErrorKind::InsufficientFunds => StatusCode::CONFLICT,
        ErrorKind::InvalidAmount
        | ErrorKind::InvalidOperationType
        | ErrorKind::OperationTypeNotSpecified
        | ErrorKind::InvalidWalletId => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Ledger(err) if status.is_server_error() => {
                tracing::error!(error = %err, "request failed");
            }
            Self::Ledger(err) => tracing::warn!(error = %err, "request rejected"),
            Self::MalformedBody(detail) => tracing::warn!(%detail, "malformed request body"),
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}
