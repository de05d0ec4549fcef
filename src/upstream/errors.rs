use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure talking to one of the third-party APIs.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{service}: connect timeout")]
    ConnectTimeout { service: &'static str },

    #[error("{service}: request timeout")]
    RequestTimeout { service: &'static str },

    #[error("{service}: connection failed: {reason}")]
    Connect {
        service: &'static str,
        reason: String,
    },

    #[error("{service} responded with {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
        details: Value,
    },

    #[error("{service}: unexpected response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },

    #[error("{service}: {reason}")]
    Unknown {
        service: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub fn from_reqwest_error(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout { service }
            } else {
                Self::RequestTimeout { service }
            }
        } else if err.is_decode() {
            Self::Malformed {
                service,
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                service,
                status,
                details: Value::Null,
            }
        } else if err.is_connect() || err.is_request() {
            Self::Connect {
                service,
                reason: err.to_string(),
            }
        } else {
            Self::Unknown {
                service,
                reason: err.to_string(),
            }
        }
    }

    pub fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            service,
            reason: reason.into(),
        }
    }

    /// Payload worth showing to the caller for diagnostics.
    pub fn details(&self) -> Value {
        match self {
            Self::Status { details, .. } if !details.is_null() => details.clone(),
            other => Value::String(other.to_string()),
        }
    }
}
