//! Error types for the core library.

use thiserror::Error;

use crate::dispatch::FlagError;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The mail store could not be reached, or the connection broke.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The mail store rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The mail store stopped answering mid-session.
    #[error("Protocol timeout: {0}")]
    ProtocolTimeout(String),

    /// The mail store refused an operation on a single message.
    #[error("Message {index} unavailable: {message}")]
    MessageUnavailable {
        /// Message sequence number.
        index: u32,
        /// Server explanation.
        message: String,
    },

    /// A command line was rejected before execution.
    #[error("{0}")]
    FlagValidation(#[from] FlagError),

    /// A header block could only be partially decoded.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// I/O error on the operator console or the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The system keyring failed. Callers fall back to prompting.
    #[error("Credential error: {0}")]
    Credential(#[from] crate::credentials::CredentialError),
}

impl Error {
    /// Returns true if the session cannot continue after this error.
    ///
    /// Network and protocol failures end the process; problems confined to
    /// one command or one message do not.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::FlagValidation(_) | Self::MalformedHeader(_) | Self::MessageUnavailable { .. }
        )
    }

    /// Maps a transport error for a request about message `index`.
    #[must_use]
    pub fn from_pop3(err: mailtriage_pop3::Error, index: Option<u32>) -> Self {
        use mailtriage_pop3::Error as Pop3Error;

        match (err, index) {
            (Pop3Error::Server(message), Some(index)) => Self::MessageUnavailable { index, message },
            (Pop3Error::Timeout(limit), _) => {
                Self::ProtocolTimeout(format!("no reply within {limit:?}"))
            }
            (Pop3Error::Auth(message), _) => Self::Authentication(message),
            (other, _) => Self::Connection(other.to_string()),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
