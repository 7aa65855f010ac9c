use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portkv_bridge::BridgeError;
use portkv_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Bridge(BridgeError::UnknownChannel(_)) => StatusCode::NOT_FOUND,
            Self::Bridge(BridgeError::Protocol(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Bridge(BridgeError::Store(StoreError::QuotaExceeded { .. }))
            | Self::Store(StoreError::QuotaExceeded { .. }) => StatusCode::INSUFFICIENT_STORAGE,
            Self::Bridge(BridgeError::Store(_))
            | Self::Store(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "port request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
