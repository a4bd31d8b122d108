//! Error taxonomy for HAL operations.
//!
//! Every public operation in the p4hal crates reports failures through
//! [`HalError`]. The taxonomy is deliberately small: lookup misses, duplicate
//! single-subscriber registrations, malformed input documents, explicitly
//! unimplemented request variants, double lifecycle transitions, and the few
//! truly unexpected states (bind/spawn failures). Ordinary misuse never
//! panics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable machine-readable code for a [`HalError`] class.
///
/// These names are what the front-door service reports on the wire, so they
/// must not change meaning between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Ok,
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Unimplemented,
    Aborted,
    Internal,
}

impl ErrorCode {
    /// Returns the canonical wire spelling of this code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Ok => "OK",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::AlreadyExists => "ALREADY_EXISTS",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::Unimplemented => "UNIMPLEMENTED",
            ErrorCode::Aborted => "ABORTED",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Returns true if the code reports success.
    pub const fn is_ok(&self) -> bool {
        matches!(self, ErrorCode::Ok)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ErrorCode::Ok),
            "NOT_FOUND" => Ok(ErrorCode::NotFound),
            "ALREADY_EXISTS" => Ok(ErrorCode::AlreadyExists),
            "INVALID_ARGUMENT" => Ok(ErrorCode::InvalidArgument),
            "UNIMPLEMENTED" => Ok(ErrorCode::Unimplemented),
            "ABORTED" => Ok(ErrorCode::Aborted),
            "INTERNAL" => Ok(ErrorCode::Internal),
            other => Err(HalError::invalid_argument(format!(
                "unknown error code: {}",
                other
            ))),
        }
    }
}

/// Error type for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// A lookup missed or a dispatch target was absent.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// A single-subscriber slot was already occupied.
    #[error("already exists: {what}")]
    AlreadyExists { what: String },

    /// An input document or request field could not be interpreted.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The request variant is a named scope limitation, not a bug.
    #[error("unimplemented: {feature}")]
    Unimplemented { feature: String },

    /// A lifecycle transition was attempted twice.
    #[error("aborted: {message}")]
    Aborted { message: String },

    /// An unexpected state: endpoint bind failure, task spawn failure.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl HalError {
    /// Creates a not-found error naming the missing item.
    pub fn not_found(what: impl Into<String>) -> Self {
        HalError::NotFound { what: what.into() }
    }

    /// Creates an already-exists error naming the occupied slot.
    pub fn already_exists(what: impl Into<String>) -> Self {
        HalError::AlreadyExists { what: what.into() }
    }

    /// Creates an invalid-argument error with a message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        HalError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an unimplemented error naming the unsupported feature.
    pub fn unimplemented(feature: impl Into<String>) -> Self {
        HalError::Unimplemented {
            feature: feature.into(),
        }
    }

    /// Creates an aborted error with a message.
    pub fn aborted(message: impl Into<String>) -> Self {
        HalError::Aborted {
            message: message.into(),
        }
    }

    /// Creates an internal error with a message.
    pub fn internal(message: impl Into<String>) -> Self {
        HalError::Internal {
            message: message.into(),
        }
    }

    /// Returns the machine-readable code for this error.
    pub const fn code(&self) -> ErrorCode {
        match self {
            HalError::NotFound { .. } => ErrorCode::NotFound,
            HalError::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            HalError::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            HalError::Unimplemented { .. } => ErrorCode::Unimplemented,
            HalError::Aborted { .. } => ErrorCode::Aborted,
            HalError::Internal { .. } => ErrorCode::Internal,
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HalError::not_found("logical id 0x10");
        assert_eq!(err.to_string(), "not found: logical id 0x10");

        let err = HalError::unimplemented("node status source");
        assert_eq!(err.to_string(), "unimplemented: node status source");
    }

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(HalError::not_found("x").code(), ErrorCode::NotFound);
        assert_eq!(
            HalError::already_exists("x").code(),
            ErrorCode::AlreadyExists
        );
        assert_eq!(
            HalError::invalid_argument("x").code(),
            ErrorCode::InvalidArgument
        );
        assert_eq!(HalError::unimplemented("x").code(), ErrorCode::Unimplemented);
        assert_eq!(HalError::aborted("x").code(), ErrorCode::Aborted);
        assert_eq!(HalError::internal("x").code(), ErrorCode::Internal);
    }

    #[test]
    fn test_code_round_trip() {
        for code in [
            ErrorCode::Ok,
            ErrorCode::NotFound,
            ErrorCode::AlreadyExists,
            ErrorCode::InvalidArgument,
            ErrorCode::Unimplemented,
            ErrorCode::Aborted,
            ErrorCode::Internal,
        ] {
            assert_eq!(code.as_str().parse::<ErrorCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!("NOT_A_CODE".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_ok_classification() {
        assert!(ErrorCode::Ok.is_ok());
        assert!(!ErrorCode::NotFound.is_ok());
    }

    #[test]
    fn test_code_json_uses_wire_spelling() {
        let json = serde_json::to_string(&ErrorCode::InvalidArgument).unwrap();
        assert_eq!(json, r#""INVALID_ARGUMENT""#);
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErrorCode::InvalidArgument);
    }
}
