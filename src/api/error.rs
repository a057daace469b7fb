use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use duckdb::Connection;
use serde_json::json;
use std::sync::MutexGuard;
use thiserror::Error;
use tracing::error;

use crate::db::DbPool;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid or missing admin password")]
    Unauthorized,
    #[error("{0}")]
    Conflict(String),
    #[error("Storage error: {0}")]
    Storage(#[from] duckdb::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::NotFound(_) => "not_found",
            ApiError::Unauthorized => "unauthorized",
            ApiError::Conflict(_) => "conflict",
            ApiError::Storage(_) | ApiError::Internal(_) => "internal",
        }
    }

    /// Text shown to the caller; storage and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            ApiError::Storage(_) => {
                "The analysis store is unavailable, please try again shortly.".to_string()
            }
            ApiError::Internal(_) => {
                "Something went wrong while processing the request.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Spanish counterpart of `public_message`. Validation details keep the
    /// English field names so clients can match them.
    fn public_message_es(&self) -> String {
        match self {
            ApiError::Validation(detail) => format!("La solicitud no es válida: {}", detail),
            ApiError::NotFound("Analysis") => "Análisis no encontrado".to_string(),
            ApiError::NotFound("Contribution") => "Contribución no encontrada".to_string(),
            ApiError::NotFound(_) => "Recurso no encontrado".to_string(),
            ApiError::Unauthorized => {
                "Contraseña de administrador inválida o ausente".to_string()
            }
            ApiError::Conflict(_) => {
                "Solo se pueden revisar las contribuciones pendientes".to_string()
            }
            ApiError::Storage(_) => {
                "El almacén de análisis no está disponible, inténtalo de nuevo en breve."
                    .to_string()
            }
            ApiError::Internal(_) => "Algo salió mal al procesar la solicitud.".to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self, ApiError::Storage(_) | ApiError::Internal(_)) {
            error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.public_message(),
            "message_es": self.public_message_es(),
        }))
    }
}

pub(crate) fn lock(pool: &DbPool) -> Result<MutexGuard<'_, Connection>, ApiError> {
    pool.lock()
        .map_err(|_| ApiError::Internal("database mutex poisoned".to_string()))
}
