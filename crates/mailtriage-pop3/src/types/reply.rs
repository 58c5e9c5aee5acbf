//! POP3 reply types.

/// Status indicator of a POP3 reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// `+OK`
    Ok,
    /// `-ERR`
    Err,
}

impl Status {
    /// Returns the wire form of the indicator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "+OK",
            Self::Err => "-ERR",
        }
    }
}

/// Status line returned by the server for every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Positive or negative status.
    pub status: Status,
    /// Free text following the status indicator.
    pub text: String,
}

impl Reply {
    /// Creates a new reply.
    #[must_use]
    pub fn new(status: Status, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    /// Returns true if the server answered `+OK`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self.status, Status::Ok)
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.status.as_str())
        } else {
            write!(f, "{} {}", self.status.as_str(), self.text)
        }
    }
}
