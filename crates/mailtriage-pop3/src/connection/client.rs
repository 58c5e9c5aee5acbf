//! Type-state POP3 client.
//!
//! The POP3 session states are:
//!
//! - `Authorization`: after the greeting, before USER/PASS succeeded
//! - `Transaction`: after login; mailbox commands are available
//!
//! QUIT from `Transaction` enters the server's UPDATE state, which is when
//! messages marked with DELE are actually removed.

#![allow(clippy::missing_errors_doc)]

use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, trace};

use super::framed::FramedStream;
use super::stream::Pop3Stream;
use crate::command::Command;
use crate::parser::parse_stat;
use crate::types::{MailboxStat, Reply};
use crate::{Error, Result};

/// Type-state marker for the authorization state.
#[derive(Debug)]
pub struct Authorization;

/// Type-state marker for the transaction state.
#[derive(Debug)]
pub struct Transaction;

/// POP3 client with type-state.
pub struct Client<S, State> {
    stream: FramedStream<S>,
    greeting: String,
    io_timeout: Duration,
    _state: PhantomData<State>,
}

// Manual Debug implementation since FramedStream doesn't implement Debug
impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("greeting", &self.greeting)
            .field("io_timeout", &self.io_timeout)
            .finish_non_exhaustive()
    }
}

impl<S> Client<S, Authorization>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a client from a stream and reads the server greeting.
    pub async fn from_stream(stream: S, io_timeout: Duration) -> Result<Self> {
        let mut stream = FramedStream::new(stream);
        let greeting = with_timeout(io_timeout, stream.read_reply()).await?;
        if !greeting.is_ok() {
            return Err(Error::Server(greeting.text));
        }
        debug!("POP3 greeting: {}", greeting.text);

        Ok(Self {
            stream,
            greeting: greeting.text,
            io_timeout,
            _state: PhantomData,
        })
    }

    /// Authenticates with USER/PASS.
    ///
    /// Consumes self and returns a client in the transaction state.
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Transaction>> {
        let reply = self
            .execute(&Command::User {
                name: username.to_string(),
            })
            .await?;
        if !reply.is_ok() {
            return Err(Error::Auth(reply.text));
        }

        let reply = self
            .execute(&Command::Pass {
                password: password.to_string(),
            })
            .await?;
        if !reply.is_ok() {
            return Err(Error::Auth(reply.text));
        }

        debug!("Logged in as {username}");
        Ok(Client {
            stream: self.stream,
            greeting: self.greeting,
            io_timeout: self.io_timeout,
            _state: PhantomData,
        })
    }
}

impl Client<Pop3Stream, Authorization> {
    /// Upgrades the connection to TLS using STLS (RFC 2595).
    pub async fn stls(mut self, host: &str) -> Result<Self> {
        let reply = self.execute(&Command::Stls).await?;
        if !reply.is_ok() {
            return Err(Error::Server(reply.text));
        }

        let stream = self.stream.into_inner().upgrade_to_tls(host).await?;
        Ok(Self {
            stream: FramedStream::new(stream),
            greeting: self.greeting,
            io_timeout: self.io_timeout,
            _state: PhantomData,
        })
    }
}

impl<S> Client<S, Transaction>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the message count and maildrop size.
    pub async fn stat(&mut self) -> Result<MailboxStat> {
        let reply = self.execute_ok(&Command::Stat).await?;
        parse_stat(&reply.text)
    }

    /// Retrieves the header block of a message plus `lines` body lines.
    pub async fn top(&mut self, msg: u32, lines: u32) -> Result<Vec<u8>> {
        let cmd = Command::Top { msg, lines };
        self.execute_ok(&cmd).await?;
        with_timeout(self.io_timeout, self.stream.read_multiline()).await
    }

    /// Marks a message for deletion. Removal happens on QUIT.
    pub async fn dele(&mut self, msg: u32) -> Result<()> {
        self.execute_ok(&Command::Dele { msg }).await?;
        Ok(())
    }

    /// Keeps the connection alive.
    pub async fn noop(&mut self) -> Result<()> {
        self.execute_ok(&Command::Noop).await?;
        Ok(())
    }

    /// Unmarks every message marked for deletion in this session.
    pub async fn rset(&mut self) -> Result<()> {
        self.execute_ok(&Command::Rset).await?;
        Ok(())
    }
}

// Common implementation for all states
impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the text of the server greeting.
    #[must_use]
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    async fn execute(&mut self, cmd: &Command) -> Result<Reply> {
        trace!("C: {cmd:?}");
        let data = cmd.serialize();
        let stream = &mut self.stream;
        let reply = with_timeout(self.io_timeout, async move {
            stream.write_command(&data).await?;
            stream.read_reply().await
        })
        .await?;
        trace!("S: {reply}");
        Ok(reply)
    }

    async fn execute_ok(&mut self, cmd: &Command) -> Result<Reply> {
        let reply = self.execute(cmd).await?;
        if reply.is_ok() {
            Ok(reply)
        } else {
            Err(Error::Server(reply.text))
        }
    }

    /// Sends QUIT and closes the connection (available in any state).
    ///
    /// From the transaction state this commits pending deletions.
    pub async fn quit(mut self) -> Result<()> {
        self.execute_ok(&Command::Quit).await?;
        Ok(())
    }
}

async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Error::Timeout(limit))?
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_greeting() {
        let mock = Builder::new().read(b"+OK POP3 ready <1.2@host>\r\n").build();
        let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
        assert_eq!(client.greeting(), "POP3 ready <1.2@host>");
    }

    #[tokio::test]
    async fn test_negative_greeting() {
        let mock = Builder::new().read(b"-ERR too busy\r\n").build();
        let result = Client::from_stream(mock, TIMEOUT).await;
        assert!(matches!(result, Err(Error::Server(text)) if text == "too busy"));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mock = Builder::new()
            .read(b"+OK ready\r\n")
            .write(b"USER alice\r\n")
            .read(b"+OK\r\n")
            .write(b"PASS wrong\r\n")
            .read(b"-ERR invalid password\r\n")
            .build();

        let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
        let result = client.login("alice", "wrong").await;
        assert!(matches!(result, Err(Error::Auth(text)) if text == "invalid password"));
    }

    #[tokio::test]
    async fn test_dele_error_is_server_error() {
        let mock = Builder::new()
            .read(b"+OK ready\r\n")
            .write(b"USER alice\r\n")
            .read(b"+OK\r\n")
            .write(b"PASS pw\r\n")
            .read(b"+OK\r\n")
            .write(b"DELE 9\r\n")
            .read(b"-ERR message 9 already deleted\r\n")
            .build();

        let client = Client::from_stream(mock, TIMEOUT).await.unwrap();
        let mut client = client.login("alice", "pw").await.unwrap();
        let err = client.dele(9).await.unwrap_err();
        assert!(!err.is_connection_lost());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_timeout() {
        // The server half never writes, so the greeting never arrives
        let (client_half, _server_half) = tokio::io::duplex(64);

        let result = Client::from_stream(client_half, TIMEOUT).await;
        assert!(matches!(result, Err(Error::Timeout(d)) if d == TIMEOUT));
    }
}
