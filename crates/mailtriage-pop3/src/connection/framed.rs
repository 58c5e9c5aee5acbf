//! Framed I/O for the POP3 protocol.
//!
//! POP3 uses CRLF-terminated lines. Single-line replies carry only a status
//! line; multi-line replies follow it with data lines terminated by a lone
//! `.` and byte-stuffed leading dots.

#![allow(clippy::missing_errors_doc)]

use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::Result;
use crate::parser::{parse_reply, unstuff_line};
use crate::types::Reply;

/// Default buffer size for reading.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Maximum line length to prevent memory exhaustion.
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Maximum size of a multi-line body.
const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Framed connection for the POP3 protocol.
pub struct FramedStream<S> {
    reader: BufReader<S>,
    write_buffer: BytesMut,
}

impl<S> FramedStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new framed stream.
    pub fn new(stream: S) -> Self {
        Self {
            reader: BufReader::with_capacity(DEFAULT_BUFFER_SIZE, stream),
            write_buffer: BytesMut::with_capacity(DEFAULT_BUFFER_SIZE),
        }
    }

    /// Reads and parses a status line.
    pub async fn read_reply(&mut self) -> Result<Reply> {
        let line = self.read_line().await?;
        parse_reply(&String::from_utf8_lossy(&line))
    }

    /// Reads the data lines of a multi-line response up to the `.` terminator.
    ///
    /// Byte-stuffing is removed; line endings are kept.
    pub async fn read_multiline(&mut self) -> Result<Vec<u8>> {
        let mut body = Vec::new();

        loop {
            let line = self.read_line().await?;
            let Some(content) = unstuff_line(&line) else {
                break;
            };

            if body.len() + content.len() > MAX_BODY_SIZE {
                return Err(crate::Error::Protocol(format!(
                    "response body too large (max {MAX_BODY_SIZE} bytes)"
                )));
            }
            body.extend_from_slice(content);
        }

        Ok(body)
    }

    /// Reads a single CRLF-terminated line.
    async fn read_line(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();

        loop {
            let buf = self.reader.fill_buf().await?;
            if buf.is_empty() {
                return Err(crate::Error::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }

            if let Some(pos) = find_line_end(buf) {
                line.extend_from_slice(&buf[..=pos]);
                self.reader.consume(pos + 1);
                break;
            }

            // No line ending found, consume all and continue
            let len = buf.len();
            line.extend_from_slice(buf);
            self.reader.consume(len);

            if line.len() > MAX_LINE_LENGTH {
                return Err(crate::Error::Protocol("line too long".to_string()));
            }
        }

        Ok(line)
    }

    /// Writes a command to the stream.
    pub async fn write_command(&mut self, data: &[u8]) -> Result<()> {
        self.write_buffer.clear();
        self.write_buffer.extend_from_slice(data);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buffer).await?;
        stream.flush().await?;

        Ok(())
    }

    /// Consumes the framed stream and returns the inner stream.
    ///
    /// Note: Any buffered data will be lost.
    pub fn into_inner(self) -> S {
        self.reader.into_inner()
    }
}

/// Finds the position of the `\n` ending a line.
///
/// Some servers terminate lines with a bare LF, so only the LF is required.
fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}
