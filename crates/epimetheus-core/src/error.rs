//! Shared error type across epimetheus crates.

use thiserror::Error;

/// Stable error categories, used in logs and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, unreadable or invalid configuration.
    Config,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// Statistics provider could not be queried.
    Provider,
    /// Provider output could not be parsed.
    Parse,
    /// A metric key is already registered.
    DuplicateMetric,
    /// An instance identity sanitizes to an empty token.
    InvalidInstance,
    /// Family registration failed.
    Registration,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Provider => "PROVIDER",
            ErrorKind::Parse => "PARSE",
            ErrorKind::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorKind::InvalidInstance => "INVALID_INSTANCE",
            ErrorKind::Registration => "REGISTRATION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, EpimetheusError>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum EpimetheusError {
    #[error("config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("stats provider: {0}")]
    Provider(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("invalid instance identity: {0:?}")]
    InvalidInstance(String),
    #[error("registration of family {family} failed: {source}")]
    Registration {
        family: String,
        #[source]
        source: Box<EpimetheusError>,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl EpimetheusError {
    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EpimetheusError::Config(_) => ErrorKind::Config,
            EpimetheusError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            EpimetheusError::Provider(_) => ErrorKind::Provider,
            EpimetheusError::Parse(_) => ErrorKind::Parse,
            EpimetheusError::DuplicateMetric(_) => ErrorKind::DuplicateMetric,
            EpimetheusError::InvalidInstance(_) => ErrorKind::InvalidInstance,
            EpimetheusError::Registration { .. } => ErrorKind::Registration,
            EpimetheusError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Wrap an error raised while registering `family`.
    pub fn registration(family: &str, source: EpimetheusError) -> Self {
        EpimetheusError::Registration {
            family: family.to_string(),
            source: Box::new(source),
        }
    }

    /// Category of the innermost error (unwraps `Registration`).
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            EpimetheusError::Registration { source, .. } => source.root_kind(),
            other => other.kind(),
        }
    }
}
