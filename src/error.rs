//! Error types and handling for the Enovates driver
//!
//! Transport failures, protocol decode failures, argument validation and
//! authorization are kept as distinct variants so callers can tell a flaky
//! link apart from a charger reporting something unexpected.

use thiserror::Error;

/// Result type alias for driver operations
pub type Result<T> = std::result::Result<T, EnovatesError>;

/// Main error type for the Enovates driver
#[derive(Debug, Error)]
pub enum EnovatesError {
    /// Modbus communication errors
    #[error("Modbus error: {message}")]
    Modbus { message: String },

    /// Timeout errors
    #[error("Timeout error: {message}")]
    Timeout { message: String },

    /// The charger answered with fewer registers than requested
    #[error("Short response: expected {expected} registers, got {actual}")]
    ShortResponse { expected: usize, actual: usize },

    /// A register value outside of its enumerated range
    #[error("Protocol decode error: invalid {field} value {raw}")]
    ProtocolDecode { field: String, raw: u32 },

    /// Caller supplied argument rejected before touching the charger
    #[error("Invalid argument: {field} - {message}")]
    InvalidArgument { field: String, message: String },

    /// Authorization check refused driver construction
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// No factory registered under the requested driver name
    #[error("Unknown driver: {name}")]
    UnknownDriver { name: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl EnovatesError {
    /// Create a new Modbus error
    pub fn modbus<S: Into<String>>(message: S) -> Self {
        EnovatesError::Modbus {
            message: message.into(),
        }
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        EnovatesError::Timeout {
            message: message.into(),
        }
    }

    /// Create a new short response error
    pub fn short_response(expected: usize, actual: usize) -> Self {
        EnovatesError::ShortResponse { expected, actual }
    }

    /// Create a new protocol decode error carrying the offending raw value
    pub fn protocol_decode<S: Into<String>>(field: S, raw: u32) -> Self {
        EnovatesError::ProtocolDecode {
            field: field.into(),
            raw,
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(field: S, message: S) -> Self {
        EnovatesError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new permission denied error
    pub fn permission_denied<S: Into<String>>(message: S) -> Self {
        EnovatesError::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a new unknown driver error
    pub fn unknown_driver<S: Into<String>>(name: S) -> Self {
        EnovatesError::UnknownDriver { name: name.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        EnovatesError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        EnovatesError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        EnovatesError::Io {
            message: message.into(),
        }
    }

    /// Whether the error originated in the transport rather than in the driver
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EnovatesError::Modbus { .. }
                | EnovatesError::Timeout { .. }
                | EnovatesError::ShortResponse { .. }
        )
    }
}

impl From<std::io::Error> for EnovatesError {
    fn from(err: std::io::Error) -> Self {
        EnovatesError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for EnovatesError {
    fn from(err: serde_yaml::Error) -> Self {
        EnovatesError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for EnovatesError {
    fn from(err: serde_json::Error) -> Self {
        EnovatesError::Serialization {
            message: err.to_string(),
        }
    }
}
