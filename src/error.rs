//! Error types for the mail event handler.

/// Top-level error type for the service binary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// The raw payload could not be turned into a typed event.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed event payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported delivery envelope: {0}")]
    UnsupportedEnvelope(String),
}

/// Suppression registry write failures.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Suppression request failed: {0}")]
    Request(String),

    #[error("Suppression registry rejected {address} with status {status}: {body}")]
    Rejected {
        address: String,
        status: u16,
        body: String,
    },
}

/// Chat alert delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to send alert to channel {channel}: {reason}")]
    SendFailed { channel: String, reason: String },

    #[error("Chat API rejected alert for channel {channel}: {error}")]
    Rejected { channel: String, error: String },
}

/// Audit log write failures.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A failure acting on a single recipient.
#[derive(Debug, thiserror::Error)]
pub enum RecipientError {
    #[error("Suppression failed for {address}: {source}")]
    Suppress {
        address: String,
        #[source]
        source: RegistryError,
    },

    #[error("Event alert failed for {address}: {source}")]
    Notify {
        address: String,
        #[source]
        source: NotifyError,
    },

    #[error("Error alert failed for {address}: {source}")]
    ErrorAlert {
        address: String,
        #[source]
        source: NotifyError,
    },
}

impl RecipientError {
    /// Address of the recipient the failure belongs to.
    pub fn address(&self) -> &str {
        match self {
            Self::Suppress { address, .. }
            | Self::Notify { address, .. }
            | Self::ErrorAlert { address, .. } => address,
        }
    }
}

/// Every recipient-level failure collected while dispatching one event.
#[derive(Debug, thiserror::Error)]
#[error("{} recipient action(s) failed for {event_type} event", .failures.len())]
pub struct DispatchError {
    pub event_type: String,
    pub failures: Vec<RecipientError>,
}

/// Failures that abort processing of a single record.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Audit log failed: {0}")]
    Audit(#[from] AuditError),

    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
