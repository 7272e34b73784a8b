use std::collections::HashMap;

use serde::Deserialize;

use crate::utils::http_error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a failed backend call, used by the central
/// interceptor and by callers that need context-specific fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimited,
    Validation,
    Server,
    Unknown,
}

const LOCKOUT_PATTERN: &str = "trop de tentatives";

impl ErrorKind {
    pub fn from_status(status: u16, server_message: Option<&str>) -> Self {
        let lockout_message = server_message
            .map(|m| m.to_lowercase().contains(LOCKOUT_PATTERN))
            .unwrap_or(false);

        match status {
            0 => ErrorKind::Network,
            401 => ErrorKind::Unauthorized,
            403 => ErrorKind::Forbidden,
            404 => ErrorKind::NotFound,
            429 => ErrorKind::RateLimited,
            _ if lockout_message => ErrorKind::RateLimited,
            409 => ErrorKind::Conflict,
            400 | 422 => ErrorKind::Validation,
            500..=599 => ErrorKind::Server,
            _ => ErrorKind::Unknown,
        }
    }
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    #[serde(default)]
    pub errors: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{method} {url} failed with status {status}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub status: u16,
    pub method: String,
    pub url: String,
    pub server_message: Option<String>,
    pub field_errors: HashMap<String, Vec<String>>,
}

impl ApiError {
    pub fn new(status: u16, method: &str, url: &str, body: ApiErrorBody) -> Self {
        Self {
            kind: ErrorKind::from_status(status, body.message.as_deref()),
            status,
            method: method.to_string(),
            url: url.to_string(),
            server_message: body.message,
            field_errors: body.errors,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Api(err) => err.kind,
            Error::Timeout(_) => ErrorKind::Network,
            Error::Reqwest(err) if err.is_connect() || err.is_timeout() || err.is_request() => {
                ErrorKind::Network
            }
            Error::Validation(_) | Error::BadRequest(_) => ErrorKind::Validation,
            _ => ErrorKind::Unknown,
        }
    }

    /// HTTP status of the failure; transport-level failures report 0.
    pub fn status(&self) -> u16 {
        match self {
            Error::Api(err) => err.status,
            Error::Reqwest(err) => err.status().map(|s| s.as_u16()).unwrap_or(0),
            _ => 0,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Api(err) => err.server_message.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for a toast, resolved against an optional
    /// context-specific table (see [`http_error`]).
    pub fn user_message(&self, custom: Option<http_error::HttpErrorMessages>) -> String {
        match self {
            Error::Validation(_) | Error::BadRequest(_) => {
                http_error::http_error_message(400, None, custom)
            }
            Error::Api(_) | Error::Reqwest(_) | Error::Timeout(_) => {
                http_error::http_error_message(self.status(), self.server_message(), custom)
            }
            _ => http_error::FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(inner) => inner,
            other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert_eq!(ErrorKind::from_status(0, None), ErrorKind::Network);
        assert_eq!(ErrorKind::from_status(401, None), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(403, None), ErrorKind::Forbidden);
        assert_eq!(ErrorKind::from_status(404, None), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(409, None), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(422, None), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(429, None), ErrorKind::RateLimited);
        assert_eq!(ErrorKind::from_status(503, None), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(418, None), ErrorKind::Unknown);
    }

    #[test]
    fn lockout_message_wins_over_validation_status() {
        let kind = ErrorKind::from_status(400, Some("Trop de tentatives, compte bloqué"));
        assert_eq!(kind, ErrorKind::RateLimited);
    }

    #[test]
    fn unauthorized_stays_unauthorized_even_with_lockout_text() {
        let kind = ErrorKind::from_status(401, Some("trop de tentatives"));
        assert_eq!(kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn api_error_prefers_server_message() {
        let err = Error::Api(ApiError::new(
            404,
            "GET",
            "http://localhost/api/candidatures/9",
            ApiErrorBody {
                message: Some("Candidature introuvable".into()),
                errors: HashMap::new(),
            },
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.user_message(None), "Candidature introuvable");
    }
}
