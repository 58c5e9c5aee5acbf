//! POP3 command builder.

use std::fmt;

/// POP3 command.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// USER - Name the mailbox
    User {
        /// Mailbox name
        name: String,
    },
    /// PASS - Supply the password for the named mailbox
    Pass {
        /// Password
        password: String,
    },
    /// STLS - Upgrade to TLS (RFC 2595)
    Stls,
    /// STAT - Message count and maildrop size
    Stat,
    /// TOP - Headers plus the first `lines` lines of the body
    Top {
        /// Message number
        msg: u32,
        /// Body lines to include
        lines: u32,
    },
    /// DELE - Mark a message as deleted
    Dele {
        /// Message number
        msg: u32,
    },
    /// NOOP - No operation
    Noop,
    /// RSET - Unmark all deleted messages
    Rset,
    /// QUIT - Commit deletions and close
    Quit,
}

impl Command {
    /// Serializes the command to bytes.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = match self {
            Self::User { name } => format!("USER {name}").into_bytes(),
            Self::Pass { password } => format!("PASS {password}").into_bytes(),
            Self::Stls => b"STLS".to_vec(),
            Self::Stat => b"STAT".to_vec(),
            Self::Top { msg, lines } => format!("TOP {msg} {lines}").into_bytes(),
            Self::Dele { msg } => format!("DELE {msg}").into_bytes(),
            Self::Noop => b"NOOP".to_vec(),
            Self::Rset => b"RSET".to_vec(),
            Self::Quit => b"QUIT".to_vec(),
        };
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Returns true if the server answers this command with a multi-line body.
    #[must_use]
    pub const fn is_multiline(&self) -> bool {
        matches!(self, Self::Top { .. })
    }
}

// Keeps passwords out of logs.
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { name } => write!(f, "USER {name}"),
            Self::Pass { .. } => f.write_str("PASS ****"),
            Self::Stls => f.write_str("STLS"),
            Self::Stat => f.write_str("STAT"),
            Self::Top { msg, lines } => write!(f, "TOP {msg} {lines}"),
            Self::Dele { msg } => write!(f, "DELE {msg}"),
            Self::Noop => f.write_str("NOOP"),
            Self::Rset => f.write_str("RSET"),
            Self::Quit => f.write_str("QUIT"),
        }
    }
}
