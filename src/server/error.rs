//! Translation of codec and image failures into HTTP responses.
//!
//! Messages describe what went wrong with the request; they never include
//! pixel data or buffer addresses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::processing::image_io::ImageIoError;
use crate::processing::{CapacityError, FormatError, StegoError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("failed to read multipart data: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Stego(#[from] StegoError),

    #[error(transparent)]
    Image(#[from] ImageIoError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart { status, .. } => *status,
            ApiError::Stego(_) => StatusCode::BAD_REQUEST,
            ApiError::Image(ImageIoError::Image(_)) | ApiError::Image(ImageIoError::Buffer(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Image(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CapacityError> for ApiError {
    fn from(e: CapacityError) -> Self {
        ApiError::Stego(e.into())
    }
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        ApiError::Stego(e.into())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("❌ Request failed: {}", self);
        }
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::TextDecodeError;

    #[test]
    fn test_codec_errors_are_client_errors() {
        let capacity: ApiError = CapacityError {
            needed: 96,
            available: 66,
        }
        .into();
        assert_eq!(capacity.status(), StatusCode::BAD_REQUEST);

        let format: ApiError = FormatError::BufferTooSmall { available: 3 }.into();
        assert_eq!(format.status(), StatusCode::BAD_REQUEST);
        assert_eq!(format.to_string(), "buffer too small for length prefix");

        let utf8 = String::from_utf8(vec![0xFF]).unwrap_err();
        let text: ApiError = StegoError::from(TextDecodeError::from(utf8)).into();
        assert_eq!(text.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_image_errors() {
        let io = ApiError::Image(ImageIoError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk",
        )));
        assert_eq!(io.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bad = ApiError::Image(ImageIoError::UnsupportedChannels(7));
        assert_eq!(bad.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::BadRequest("No image provided".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Multipart {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
