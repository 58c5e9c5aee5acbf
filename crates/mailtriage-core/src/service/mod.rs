//! Access to the remote mail store.
//!
//! The session only talks to the store through [`Mailbox`], so it can run
//! against a real POP3 server ([`Pop3Mailbox`]) or an in-memory fake.

mod pop3;

pub use pop3::{Pop3Mailbox, connect_and_login};

use crate::Result;

/// Operations the triage session needs from a mail store.
///
/// Indices are 1-based message sequence numbers. Deletions become final
/// when the mailbox is closed.
#[allow(async_fn_in_trait)]
pub trait Mailbox {
    /// Number of messages in the store.
    async fn message_count(&mut self) -> Result<u32>;

    /// Raw header block of one message.
    async fn fetch_header(&mut self, index: u32) -> Result<Vec<u8>>;

    /// Marks one message for deletion.
    async fn delete_message(&mut self, index: u32) -> Result<()>;

    /// Commits deletions and ends the connection.
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}
