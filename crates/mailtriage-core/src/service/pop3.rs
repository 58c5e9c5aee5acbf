//! [`Mailbox`] over a POP3 connection.

use mailtriage_pop3::{Client, Config, Pop3Stream, Transaction, connect};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info};

use super::Mailbox;
use crate::{Error, Result};

/// A logged-in POP3 session.
#[derive(Debug)]
pub struct Pop3Mailbox<S = Pop3Stream> {
    client: Client<S, Transaction>,
}

impl<S> Pop3Mailbox<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a client that is already in the transaction state.
    #[must_use]
    pub const fn new(client: Client<S, Transaction>) -> Self {
        Self { client }
    }
}

/// Connects to the server and logs in.
///
/// # Errors
///
/// Returns [`Error::Connection`] if the server cannot be reached or the
/// TLS handshake fails, and [`Error::Authentication`] if the credentials
/// are refused.
pub async fn connect_and_login(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<Pop3Mailbox> {
    let client = connect(config)
        .await
        .map_err(|e| Error::Connection(e.to_string()))?;
    debug!("Server greeting: {}", client.greeting());

    let client = client.login(username, password).await.map_err(|e| match e {
        mailtriage_pop3::Error::Auth(msg) => Error::Authentication(msg),
        other => Error::from_pop3(other, None),
    })?;

    info!("Logged in to {} as {username}", config.host);
    Ok(Pop3Mailbox::new(client))
}

impl<S> Mailbox for Pop3Mailbox<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn message_count(&mut self) -> Result<u32> {
        let stat = self
            .client
            .stat()
            .await
            .map_err(|e| Error::from_pop3(e, None))?;
        debug!("Mailbox holds {} messages ({} bytes)", stat.count, stat.size);
        Ok(stat.count)
    }

    async fn fetch_header(&mut self, index: u32) -> Result<Vec<u8>> {
        self.client
            .top(index, 0)
            .await
            .map_err(|e| Error::from_pop3(e, Some(index)))
    }

    async fn delete_message(&mut self, index: u32) -> Result<()> {
        self.client
            .dele(index)
            .await
            .map_err(|e| Error::from_pop3(e, Some(index)))
    }

    async fn close(self) -> Result<()> {
        self.client.quit().await.map_err(|e| Error::from_pop3(e, None))?;
        info!("Connection closed, deletions committed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::io::Builder;

    async fn mailbox(mock: tokio_test::io::Mock) -> Pop3Mailbox<tokio_test::io::Mock> {
        let client = Client::from_stream(mock, Duration::from_secs(5))
            .await
            .unwrap();
        Pop3Mailbox::new(client.login("me", "pw").await.unwrap())
    }

    fn login(builder: &mut Builder) -> &mut Builder {
        builder
            .read(b"+OK POP3 ready\r\n")
            .write(b"USER me\r\n")
            .read(b"+OK\r\n")
            .write(b"PASS pw\r\n")
            .read(b"+OK logged in\r\n")
    }

    #[tokio::test]
    async fn test_count_fetch_delete_close() {
        let mock = login(&mut Builder::new())
            .write(b"STAT\r\n")
            .read(b"+OK 2 3200\r\n")
            .write(b"TOP 2 0\r\n")
            .read(b"+OK\r\nSubject: hi\r\n\r\n.\r\n")
            .write(b"DELE 2\r\n")
            .read(b"+OK marked\r\n")
            .write(b"QUIT\r\n")
            .read(b"+OK bye\r\n")
            .build();

        let mut mailbox = mailbox(mock).await;
        assert_eq!(mailbox.message_count().await.unwrap(), 2);
        let header = mailbox.fetch_header(2).await.unwrap();
        assert!(header.starts_with(b"Subject: hi"));
        mailbox.delete_message(2).await.unwrap();
        mailbox.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_message_is_recoverable() {
        let mock = login(&mut Builder::new())
            .write(b"TOP 9 0\r\n")
            .read(b"-ERR no such message\r\n")
            .build();

        let mut mailbox = mailbox(mock).await;
        let err = mailbox.fetch_header(9).await.unwrap_err();
        assert!(matches!(err, Error::MessageUnavailable { index: 9, .. }));
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_dropped_connection_is_fatal() {
        let mock = login(&mut Builder::new())
            .write(b"DELE 1\r\n")
            .build();

        let mut mailbox = mailbox(mock).await;
        let err = mailbox.delete_message(1).await.unwrap_err();
        assert!(err.is_fatal());
    }
}
