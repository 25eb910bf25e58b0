//! Error types for bce-core
//!
//! One error type covers configuration failures raised at construction time,
//! classified service errors parsed from non-2xx responses, and transport
//! failures that are propagated without classification.

use std::fmt;

use thiserror::Error;

/// Result type alias for bce-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bce-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file or client configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Endpoint is not an absolute URL with a host
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Service identifier does not follow the naming rules
    #[error("Invalid service id: {0}")]
    InvalidServiceId(String),

    /// Credentials are missing or empty
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// Request could not be built (bad header, bad path, empty argument)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Profile not found
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Profile already exists
    #[error("Profile already exists: {0}")]
    ProfileExists(String),

    /// Non-2xx response from the service
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Transport failure talking to the endpoint
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// The classified service error, if this is one
    pub fn as_service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::Service(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status code carried by a service error
    pub fn status_code(&self) -> Option<u16> {
        self.as_service_error().map(|e| e.status_code)
    }
}

/// Coarse fault attribution of a service error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// 4xx: the caller sent something wrong
    Client,
    /// 5xx: the service failed
    Service,
}

impl ErrorType {
    /// Classify an HTTP status code
    pub const fn from_status(status_code: u16) -> Self {
        if status_code >= 500 {
            ErrorType::Service
        } else {
            ErrorType::Client
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::Client => write!(f, "Client"),
            ErrorType::Service => write!(f, "Service"),
        }
    }
}

/// A non-success response from a BCE service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "{message} (Status Code: {status_code}; Error Code: {}; Request ID: {})",
    or_dash(.code),
    or_dash(.request_id)
)]
pub struct ServiceError {
    /// Service error code, e.g. `InternalError`
    pub code: Option<String>,

    /// Human-readable message
    pub message: String,

    /// Request identifier for support correlation
    pub request_id: Option<String>,

    /// HTTP status code
    pub status_code: u16,

    /// Client or Service fault
    pub error_type: ErrorType,
}

impl ServiceError {
    /// Create a service error; the classification is derived from the status code.
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            code: None,
            message: message.into(),
            request_id: None,
            status_code,
            error_type: ErrorType::from_status(status_code),
        }
    }

    /// Set the error code
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Set the request identifier
    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Whether the classification allows a caller-controlled retry
    ///
    /// No retry happens inside this crate.
    pub fn is_retryable(&self) -> bool {
        self.error_type == ErrorType::Service
    }
}

fn or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
