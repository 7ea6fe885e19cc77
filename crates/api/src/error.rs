use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ocr::UploadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("File not found")]
    FileNotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upload(UploadError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(e) => e.status(),
            ApiError::FileNotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
