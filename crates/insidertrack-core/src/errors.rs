//! Error facility for insidertrack
//!
//! Every fallible operation in the workspace returns [`ExError`], a structured
//! error carrying a stable [`ExErrorKind`] plus optional context (operation,
//! entity key, message, source). Kinds map to stable `ERR_*` codes that the
//! CLI and tests match on instead of parsing messages.

use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Canonical error kind taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    /// A snapshot cannot be fingerprinted or stored as given
    MalformedInput,
    /// A caller-supplied argument (entity key, limit, flag combination) is invalid
    InvalidInput,
    NotFound,

    // Storage
    Io,
    /// A stored or submitted document could not be (de)serialized
    Serialization,
    /// The current snapshot was saved but a conditional History or
    /// Change Log write failed afterwards
    PartialCommit,

    // Setup
    Config,
}

/// How loudly a caller should treat an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::PartialCommit => "ERR_PARTIAL_COMMIT",
            ExErrorKind::Config => "ERR_CONFIG",
        }
    }

    /// Severity of this kind. Only a partial commit is a warning: the current
    /// view is consistent and the missing writes can be resumed.
    pub fn severity(&self) -> Severity {
        match self {
            ExErrorKind::PartialCommit => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_key: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_key: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity key context
    pub fn with_entity_key(mut self, key: impl Into<String>) -> Self {
        self.entity_key = Some(key.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity key context, if any
    pub fn entity_key(&self) -> Option<&str> {
        self.entity_key.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.entity_key {
            write!(f, " (entity: {})", key)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

/// Configuration errors raised while building an [`crate::config::EngineConfig`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Change log retention must keep at least one entry
    #[error("max_change_history must be at least 1, got {0}")]
    ZeroRetention(usize),

    /// Unknown metrics comparison policy name
    #[error("unknown metrics policy: {0}")]
    UnknownMetricsPolicy(String),

    /// The same company slug is configured twice
    #[error("duplicate company slug: {0}")]
    DuplicateCompany(String),

    /// A configured slug is not a valid entity key
    #[error("invalid company slug {slug}: {reason}")]
    InvalidSlug { slug: String, reason: String },

    /// The config file could not be parsed
    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<ConfigError> for ExError {
    fn from(err: ConfigError) -> Self {
        ExError::new(ExErrorKind::Config)
            .with_op("config")
            .with_message(err.to_string())
    }
}

/// Create an IO error for a store operation
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a malformed-input error
pub fn malformed(operation: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::MalformedInput)
        .with_op(operation.to_string())
        .with_message(reason)
}
