//! Error types for the portal client and the requirement form.
//!
//! # Design
//! All non-2xx responses land in `ApiError::HttpError` with the raw status
//! code and body; the form extracts a user-facing message from the body with
//! `server_message`. Network failures never reach the parser, so they have a
//! separate `TransportError` produced by the host.

use serde::Deserialize;
use thiserror::Error;

use crate::form::FormField;

/// Errors returned by `PortalClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl ApiError {
    /// The `message` field of a JSON failure body, if the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::HttpError { body, .. } = self else {
            return None;
        };
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The request never produced a response (offline, DNS, connection reset).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// A single form input that failed typed parsing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FieldError {
    #[error("{0} is required")]
    Missing(FormField),

    #[error("{field} is not a valid number: {input:?}")]
    Malformed { field: FormField, input: String },

    #[error("{field} is out of range: {input:?}")]
    OutOfRange { field: FormField, input: String },
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            FieldError::Missing(field) => *field,
            FieldError::Malformed { field, .. } | FieldError::OutOfRange { field, .. } => *field,
        }
    }
}

/// Reasons the form view refuses an operation.
#[derive(Debug, Error)]
pub enum FormError {
    /// No authenticated user, or the user is not a client.
    #[error("only clients can create or edit requirements")]
    AccessDenied,

    /// A submission is already in flight.
    #[error("a submission is already in progress")]
    Busy,

    /// `finish_submit` was called without a submission in flight.
    #[error("no submission in progress")]
    NotSubmitting,

    /// At least one field failed validation.
    #[error("invalid form: {}", .0.first().map(ToString::to_string).unwrap_or_default())]
    Invalid(Vec<FieldError>),

    #[error(transparent)]
    Api(#[from] ApiError),
}
