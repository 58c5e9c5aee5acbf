//! POP3 response parser.

use crate::error::{Error, Result};
use crate::types::{MailboxStat, Reply, Status};

/// Parses a POP3 status line.
///
/// Status lines look like `+OK text` or `-ERR text`; the text is optional.
///
/// # Errors
///
/// Returns an error if the line starts with neither indicator.
pub fn parse_reply(line: &str) -> Result<Reply> {
    let line = line.trim_end_matches(['\r', '\n']);

    let (status, rest) = if let Some(rest) = line.strip_prefix("+OK") {
        (Status::Ok, rest)
    } else if let Some(rest) = line.strip_prefix("-ERR") {
        (Status::Err, rest)
    } else {
        return Err(Error::Protocol(format!("Malformed status line: {line}")));
    };

    // The indicator must be followed by a space or the end of the line
    if !rest.is_empty() && !rest.starts_with(' ') {
        return Err(Error::Protocol(format!("Malformed status line: {line}")));
    }

    Ok(Reply::new(status, rest.trim_start()))
}

/// Parses the text of a positive `STAT` reply (`nn mm`).
///
/// # Errors
///
/// Returns an error if either number is missing or invalid.
pub fn parse_stat(text: &str) -> Result<MailboxStat> {
    let mut parts = text.split_whitespace();
    let count = parts
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| Error::Protocol(format!("Invalid STAT reply: {text}")))?;
    let size = parts
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| Error::Protocol(format!("Invalid STAT reply: {text}")))?;

    Ok(MailboxStat { count, size })
}

/// Removes the byte-stuffing from one line of a multi-line response.
///
/// Returns `None` for the terminating `.` line.
#[must_use]
pub fn unstuff_line(line: &[u8]) -> Option<&[u8]> {
    let content = line.strip_suffix(b"\r\n").unwrap_or(line);
    if content == b"." {
        return None;
    }
    Some(if content.starts_with(b"..") {
        &line[1..]
    } else {
        line
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_reply() {
        let reply = parse_reply("+OK POP3 server ready\r\n").unwrap();
        assert!(reply.is_ok());
        assert_eq!(reply.text, "POP3 server ready");
    }

    #[test]
    fn test_parse_bare_ok() {
        let reply = parse_reply("+OK").unwrap();
        assert!(reply.is_ok());
        assert_eq!(reply.text, "");
    }

    #[test]
    fn test_parse_err_reply() {
        let reply = parse_reply("-ERR no such message").unwrap();
        assert_eq!(reply.status, Status::Err);
        assert_eq!(reply.text, "no such message");
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_reply("* OK imap").is_err());
        assert!(parse_reply("+OKAY").is_err());
        assert!(parse_reply("").is_err());
    }

    #[test]
    fn test_parse_stat() {
        let stat = parse_stat("250 1048576").unwrap();
        assert_eq!(stat.count, 250);
        assert_eq!(stat.size, 1_048_576);

        assert!(parse_stat("250").is_err());
        assert!(parse_stat("many bytes").is_err());
    }

    #[test]
    fn test_unstuff_line() {
        assert_eq!(unstuff_line(b".\r\n"), None);
        assert_eq!(unstuff_line(b"..hidden\r\n"), Some(&b".hidden\r\n"[..]));
        assert_eq!(
            unstuff_line(b"Subject: hi\r\n"),
            Some(&b"Subject: hi\r\n"[..])
        );
    }
}
