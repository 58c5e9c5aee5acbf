//! POP3 connection management.
//!
//! This module provides connection handling for POP3 servers, including:
//! - Configuration (host, port, security mode, timeouts)
//! - TLS/plaintext stream abstraction
//! - Framed I/O for status lines and dot-terminated bodies
//! - Type-state client wrapper

mod client;
mod config;
mod framed;
mod stream;

pub use client::{Authorization, Client, Transaction};
pub use config::{Config, ConfigBuilder, POP3_PORT, POP3S_PORT, Security};
pub use framed::FramedStream;
pub use stream::{Pop3Stream, create_tls_connector, open};

use crate::Result;
use tracing::{info, warn};

/// Connects to the server and reads the greeting, upgrading with STLS when
/// the configuration asks for it.
///
/// # Errors
///
/// Returns an error if the connection, greeting or TLS upgrade fails.
pub async fn connect(config: &Config) -> Result<Client<Pop3Stream, Authorization>> {
    let stream = open(config).await?;
    let client = Client::from_stream(stream, config.io_timeout).await?;
    info!(
        "Connected to {}:{} ({:?})",
        config.host, config.port, config.security
    );

    if config.security.needs_stls() {
        return client.stls(&config.host).await;
    }
    if !config.security.is_encrypted() {
        warn!("POP3 session to {} is not encrypted", config.host);
    }
    Ok(client)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves one connection: sends `greeting`, returns the first line
    /// received (if any) after answering it with `answer`.
    async fn serve_once(
        greeting: &'static [u8],
        answer: &'static [u8],
    ) -> (u16, JoinHandle<Option<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let (read, mut write) = socket.into_split();
            write.write_all(greeting).await.unwrap();
            let line = BufReader::new(read).lines().next_line().await.unwrap();
            if line.is_some() {
                write.write_all(answer).await.unwrap();
            }
            line
        });
        (port, server)
    }

    #[tokio::test]
    async fn test_starttls_sends_stls_after_greeting() {
        let (port, server) =
            serve_once(b"+OK ready\r\n", b"-ERR TLS not available\r\n").await;
        let config = Config::builder("127.0.0.1")
            .security(Security::StartTls)
            .port(port)
            .build();

        let result = connect(&config).await;
        assert!(matches!(result, Err(Error::Server(text)) if text == "TLS not available"));
        assert_eq!(server.await.unwrap().as_deref(), Some("STLS"));
    }

    #[tokio::test]
    async fn test_plaintext_sends_nothing_before_login() {
        let (port, server) = serve_once(b"+OK ready\r\n", b"").await;
        let config = Config::builder("127.0.0.1")
            .security(Security::None)
            .port(port)
            .build();

        let client = connect(&config).await.unwrap();
        assert_eq!(client.greeting(), "ready");
        drop(client);
        assert_eq!(server.await.unwrap(), None);
    }
}
