//! SDK error type

use helpdesk_domain::{Action, Failure, Locale, ValidationError};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Machine-readable error codes the API attaches to some failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The role cannot be taken away from this user.
    RoleRemovalForbidden,
    Other(String),
}

impl ErrorCode {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("ROLE_REMOVAL_FORBIDDEN") {
            ErrorCode::RoleRemovalForbidden
        } else {
            ErrorCode::Other(raw.trim().to_string())
        }
    }
}

/// Error type for helpdesk SDK operations
#[derive(Error, Debug)]
pub enum Error {
    /// API error returned by the server
    #[error("API error ({status_code}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status_code: u16,
        code: Option<ErrorCode>,
        message: Option<String>,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form rejected before any request was sent
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Not permitted: {0:?}")]
    NotPermitted(Action),

    /// The view that issued the request went away
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Build an API error from a non-success response body.
    ///
    /// The message is read from `message`, `error.message`, a bare JSON
    /// string, or the plain-text body, in that order.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let (code, message) = match serde_json::from_slice::<Value>(body) {
            Ok(Value::String(text)) => (None, Some(text)),
            Ok(Value::Object(map)) => {
                let nested = map.get("error");
                let field = |name: &str| {
                    map.get(name)
                        .and_then(Value::as_str)
                        .or_else(|| nested.and_then(|e| e.get(name)).and_then(Value::as_str))
                        .map(str::to_string)
                };
                let message = field("message")
                    .or_else(|| nested.and_then(Value::as_str).map(str::to_string));
                (field("code").map(|c| ErrorCode::parse(&c)), message)
            }
            _ => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (None, Some(text).filter(|t| !t.is_empty()))
            }
        };

        Error::Api {
            status_code: status.as_u16(),
            code,
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            Error::Api { code, .. } => code.as_ref(),
            _ => None,
        }
    }

    /// Returns true if this is a bad request (400)
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::Api { status_code: 400, .. })
    }

    /// Returns true if this is an authentication error (401), or no session
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 401, .. } | Error::NotAuthenticated)
    }

    /// Returns true if this is an authorization error (403)
    pub fn is_authorization_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 403, .. } | Error::NotPermitted(_))
    }

    /// Returns true if this is a not found error (404)
    pub fn is_not_found_error(&self) -> bool {
        matches!(self, Error::Api { status_code: 404, .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }

    pub fn is_role_removal_forbidden(&self) -> bool {
        self.code() == Some(&ErrorCode::RoleRemovalForbidden)
    }

    /// Text for the error banner: the server's message when it sent one,
    /// otherwise the caller's fallback for `failure`.
    pub fn user_message(&self, failure: Failure, locale: Locale) -> String {
        match self {
            Error::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Validation(err) => err.localized(locale),
            _ => failure.fallback(locale).to_string(),
        }
    }
}
