use std::net::AddrParseError;

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use cubby_store::RegistryError;
use hyper::StatusCode;
use serde_json::json;
use tokio::sync::broadcast;

#[derive(thiserror::Error, Debug)]
pub enum ShareError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// upload parsing
    #[error("Multipart error: {0}")]
    Multipart(#[from] multer::Error),
    #[error("upload has no file field")]
    MissingFile,

    /// server plumbing
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),
    #[error("Addr parse error: {0}")]
    AddrParse(#[from] AddrParseError),
    #[error("Broadcast send error: {0}")]
    BroadcastSend(#[from] broadcast::error::SendError<()>),
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        match self {
            ShareError::Registry(err) => err.into_response(),
            ShareError::Multipart(_) | ShareError::MissingFile => {
                let error = json!({
                    "error": self.to_string()
                });
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            _ => {
                let error = json!({
                    "error": self.to_string()
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}
