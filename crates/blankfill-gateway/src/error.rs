// SPDX-FileCopyrightText: 2026 Blankfill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error mapping for the gateway.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use blankfill_core::BlankfillError;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub detail: String,
}

/// An error a handler or middleware turns into an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// 403: missing or invalid credentials.
    Forbidden(String),
    /// 404: no such request.
    NotFound(String),
    /// 422: malformed body or query parameters.
    Unprocessable(String),
    /// 500: anything the client cannot fix. Details stay in the logs.
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BlankfillError> for ApiError {
    fn from(err: BlankfillError) -> Self {
        match err {
            BlankfillError::Validation(message) => Self::Unprocessable(message),
            BlankfillError::NotFound { id } => Self::NotFound(format!("request {id} not found")),
            other => {
                tracing::error!(error = %other, "request handling failed");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            Self::Forbidden(d) | Self::NotFound(d) | Self::Unprocessable(d) => d,
            Self::Internal => "Unexpected error".to_string(),
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (BlankfillError::Validation("bad".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (BlankfillError::NotFound { id: "x".into() }, StatusCode::NOT_FOUND),
            (
                BlankfillError::UnexpectedStore {
                    source: "disk full".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (BlankfillError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = ApiError::from(BlankfillError::Internal("secret path".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
