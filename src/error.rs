//! # Errores de la API HTTP
//! src/error.rs
//!
//! Cada error termina el request con su código y un mensaje en texto plano.
//! Ninguno se reintenta del lado del servidor.

use crate::http::{ParseError, Response, StatusCode};
use crate::tasks::TaskError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Id desconocido o ruta inexistente
    #[error("{0}")]
    NotFound(String),

    /// Request malformado o falta el segmento `{id}`
    #[error("{0}")]
    BadRequest(String),

    /// Método no válido para la ruta
    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    /// No se pudo serializar la respuesta
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NotFound,
            ApiError::BadRequest(_) => StatusCode::BadRequest,
            ApiError::MethodNotAllowed(_) => StatusCode::MethodNotAllowed,
            ApiError::Internal(_) => StatusCode::InternalServerError,
        }
    }

    pub fn into_response(self) -> Response {
        Response::text(self.status(), &self.to_string())
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            // Solo la usa el runner; si llegara a un handler es un bug interno
            TaskError::InvalidTransition { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnsupportedMethod { method, .. } => ApiError::MethodNotAllowed(method),
            other => ApiError::BadRequest(format!("invalid request: {}", other)),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
