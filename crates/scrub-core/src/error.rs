use thiserror::Error;

/// Convenience alias used across the workspace.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Input problems caught before any network traffic is issued.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("text is empty; nothing to anonymize")]
    EmptyText,
    #[error("{field} out of range: {value} is not within [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: String,
        max: String,
    },
    #[error("{field} expects a number, got '{value}'")]
    NotNumeric { field: String, value: String },
    #[error("unknown parameter '{0}'")]
    UnknownField(String),
    #[error("expected KEY=VALUE, got '{0}'")]
    MalformedPair(String),
    // Actual size rounds up so one byte over the limit never reports
    // the limit itself.
    #[error(
        "file size ({} MB) exceeds maximum allowed size ({} MB)",
        (.actual + 1_048_575) / 1_048_576,
        .limit / 1_048_576
    )]
    FileTooLarge { actual: u64, limit: u64 },
    #[error("unsupported file type '{extension}'; allowed types: {allowed}")]
    UnsupportedFileType { extension: String, allowed: String },
    #[error("file has no usable name: {0}")]
    InvalidFilename(String),
}

/// Failure talking to the anonymization backend: either no response at all,
/// or a non-2xx status with whatever detail the body carried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("could not connect to the backend at {url}")]
    ConnectFailed { url: String },
    #[error("backend returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("transport failure: {detail}")]
    Other { detail: String },
}

impl TransportError {
    /// HTTP status, when a response was actually received.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            TransportError::Status { detail, .. } | TransportError::Other { detail } => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        if err.is_timeout() {
            TransportError::Timeout { url }
        } else if err.is_connect() {
            TransportError::ConnectFailed { url }
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                detail: err.to_string(),
            }
        } else {
            TransportError::Other {
                detail: err.to_string(),
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("provider '{name}' is not available: {reason}")]
    UnavailableProvider { name: String, reason: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ScrubError {
    fn from(err: reqwest::Error) -> Self {
        ScrubError::Transport(TransportError::from(err))
    }
}

impl ScrubError {
    /// Collapse into the single user-facing string shown inline in a session.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
