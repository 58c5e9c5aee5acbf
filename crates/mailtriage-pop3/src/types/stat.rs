//! Mailbox statistics.

/// Result of the `STAT` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MailboxStat {
    /// Number of messages in the maildrop, excluding ones marked deleted.
    pub count: u32,
    /// Total size of those messages in octets.
    pub size: u64,
}
