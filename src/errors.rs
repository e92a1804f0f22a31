//! Error types for the container app CLI
//!
//! Each concern gets its own error enum so callers can match on the failure
//! family they care about. `AppError` wraps them all for the binary.
//!
//! Only [`ManifestError`] and [`ValidationError`] are fatal to manifest
//! resolution. Conflicting overrides are reported as warnings, not errors
//! (see [`crate::app::resolver::ConflictWarning`]).

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Manifest parsing errors (malformed or unreadable manifest text)
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("Manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error reading or writing a manifest
    #[error("I/O error reading manifest: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Invalid YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// The document root is not a mapping
    #[error("Manifest root must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// Field path could not be parsed
    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Validation errors raised after resolution
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Required field missing from the resolved document
    #[error(
        "Missing required field '{field}' in the manifest; \
         set it in the manifest or pass it on the command line"
    )]
    MissingField { field: String },

    /// Resource type is not a container app
    #[error("Unsupported resource type '{found}', expected '{expected}'")]
    UnsupportedType { found: String, expected: String },

    /// An override cannot be written because an intermediate value is not a mapping
    #[error("Cannot set '{path}': '{parent}' is not a mapping")]
    NotAMapping { path: String, parent: String },

    /// An override addresses a list entry that does not exist
    #[error("Cannot set '{path}': no list entry at '{parent}'")]
    MissingListEntry { path: String, parent: String },

    /// A `path=value` assignment could not be parsed
    #[error("Invalid assignment '{input}': {reason}")]
    InvalidAssignment { input: String, reason: String },

    /// Resource name or group violates naming rules
    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors reported by, or while talking to, the management service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with an error status
    #[error("Service error (HTTP {status}) {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    /// Resource does not exist
    #[error("Resource not found: {resource_id}")]
    NotFound { resource_id: String },

    /// Response body was not a resource representation
    #[error("Invalid service response: {reason}")]
    InvalidResponse { reason: String },

    /// Request URL could not be built
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// Provisioning reached a terminal failure state
    #[error("Provisioning of {resource_id} ended in state '{state}'")]
    ProvisioningFailed { resource_id: String, state: String },

    /// Provisioning did not reach a terminal state in time
    #[error("Provisioning of {resource_id} did not finish within {seconds} seconds")]
    ProvisioningTimeout { resource_id: String, seconds: u64 },
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No access token configured
    #[error(
        "Missing access token. Set CONTAINERAPP_ACCESS_TOKEN \
         or add access_token to the [client] config section"
    )]
    MissingToken,

    /// Token is present but unusable as a header value
    #[error("Invalid access token: {reason}")]
    InvalidToken { reason: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Unknown key passed to `configure --defaults`
    #[error("Unknown default '{key}'. Supported defaults: location, group, subscription")]
    UnknownDefault { key: String },

    /// Required setting missing from every source
    #[error("Missing required setting: {field}. {hint}")]
    MissingSetting { field: String, hint: String },

    /// The user config directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// File I/O error
    #[error("Configuration file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One failed field check
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    pub path: String,
    pub expected: Value,
    pub actual: Value,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

/// Verification errors
#[derive(Error, Debug, PartialEq)]
pub enum AssertionError {
    /// First mismatch found
    #[error("Check failed for {0}")]
    Mismatch(FieldMismatch),

    /// Every mismatch found
    #[error("{} check(s) failed:\n{}", .0.len(), render_mismatches(.0))]
    Multiple(Vec<FieldMismatch>),
}

impl AssertionError {
    /// All mismatches carried by this error
    pub fn mismatches(&self) -> &[FieldMismatch] {
        match self {
            AssertionError::Mismatch(m) => std::slice::from_ref(m),
            AssertionError::Multiple(all) => all,
        }
    }
}

fn render_mismatches(mismatches: &[FieldMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| format!("  {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("{message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Whether the error stops manifest resolution itself
    ///
    /// Service and assertion failures happen after resolution and are
    /// owned by the service boundary or the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Manifest(_) | AppError::Validation(_))
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Manifest(_) => "manifest",
            AppError::Validation(_) => "validation",
            AppError::Service(_) => "service",
            AppError::Auth(_) => "authentication",
            AppError::Config(_) => "config",
            AppError::Assertion(_) => "assertion",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Validation result type alias
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Service result type alias
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
