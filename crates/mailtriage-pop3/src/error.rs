//! Error types for POP3 operations.

use std::io;
use std::time::Duration;

/// Result type alias for POP3 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// POP3 error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TLS error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Invalid DNS name for TLS.
    #[error("Invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// Server answered a command with `-ERR`.
    #[error("Server returned -ERR: {0}")]
    Server(String),

    /// Authentication was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Operation timed out.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Protocol violation or unexpected data.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid state for operation.
    #[error("Invalid state for operation: {0}")]
    InvalidState(String),
}

impl Error {
    /// Returns true if the connection can no longer be trusted after this error.
    ///
    /// A `-ERR` reply leaves the session usable; everything else does not.
    #[must_use]
    pub const fn is_connection_lost(&self) -> bool {
        !matches!(self, Self::Server(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_keeps_connection() {
        assert!(!Error::Server("no such message".into()).is_connection_lost());
        assert!(Error::Timeout(Duration::from_secs(5)).is_connection_lost());
        assert!(Error::Protocol("garbage".into()).is_connection_lost());
    }
}
