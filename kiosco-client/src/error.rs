//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required (HTTP 401) - the caller must clear the
    /// session and send the user back to the login screen
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied (HTTP 403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this error must trigger the blanket session-invalidation
    /// policy (clear token, redirect to login).
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// User-facing message for notices; prefers the backend's detail text.
    pub fn display_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "La petición tardó demasiado".to_string(),
            Self::Http(_) => "Error de conexión con el servidor".to_string(),
            Self::Unauthorized => "Tu sesión ha expirado. Inicia sesión nuevamente.".to_string(),
            Self::Forbidden(detail) if !detail.is_empty() => detail.clone(),
            Self::Forbidden(_) => "No tienes permisos para esta acción".to_string(),
            Self::NotFound(detail) if !detail.is_empty() => detail.clone(),
            Self::NotFound(_) => "Recurso no encontrado".to_string(),
            Self::Validation(detail) if !detail.is_empty() => detail.clone(),
            Self::Validation(_) => "Datos inválidos".to_string(),
            Self::Internal(detail) if !detail.is_empty() => detail.clone(),
            Self::Internal(_) => "Error en la petición".to_string(),
            Self::InvalidResponse(_) | Self::Serialization(_) => {
                "Respuesta inválida del servidor".to_string()
            }
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_401_is_an_auth_failure() {
        assert!(ClientError::Unauthorized.is_auth_failure());
        assert!(!ClientError::Forbidden("no".into()).is_auth_failure());
        assert!(!ClientError::Internal("x".into()).is_auth_failure());
    }

    #[test]
    fn display_message_surfaces_backend_detail() {
        let err = ClientError::Validation("Stock insuficiente".into());
        assert_eq!(err.display_message(), "Stock insuficiente");
        let err = ClientError::Validation(String::new());
        assert_eq!(err.display_message(), "Datos inválidos");
    }
}
