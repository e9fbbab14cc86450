use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;
use waste_shared::ErrorResponse;

/// Model artifact could not be brought up. Fatal: the server never binds.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Model artifact not found: {}", .0.display())]
    ModelNotFound(PathBuf),
    #[error("Unsupported model format: {} (expected .onnx or .pt)", .0.display())]
    UnsupportedModelFormat(PathBuf),
    #[error("Model backend '{backend}' is not compiled in, cannot load {}", .path.display())]
    BackendDisabled { backend: &'static str, path: PathBuf },
    #[error("Failed to load model {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },
}

/// Failure while turning one candidate image into a prediction.
/// Reported to the user; the session carries on.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unexpected tensor shape: {0}")]
    Shape(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("invalid model output: {0}")]
    InvalidOutput(String),
}

impl From<ndarray::ShapeError> for PredictionError {
    fn from(err: ndarray::ShapeError) -> Self {
        PredictionError::Shape(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Request-level failures of the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed multipart payload: {0}")]
    Multipart(String),
    #[error("Invalid JSON in '{part}' part: {reason}")]
    InvalidJson { part: String, reason: String },
    #[error("Unsupported file type: {0} (allowed: jpg, jpeg, png, webp)")]
    UnsupportedFileType(String),
    #[error("Part '{part}' exceeds the {limit} byte limit")]
    PayloadTooLarge { part: String, limit: usize },
    #[error("Classification worker failed")]
    Blocking,
}

impl From<actix_multipart::MultipartError> for ApiError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        ApiError::Multipart(err.to_string())
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(_: actix_web::error::BlockingError) -> Self {
        ApiError::Blocking
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Multipart(_)
            | ApiError::InvalidJson { .. }
            | ApiError::UnsupportedFileType(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Blocking => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
