//! MIME decoding utilities.
//!
//! Base64 and Quoted-Printable transfer encodings, plus RFC 2047 encoded
//! words in header values.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data.trim()).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045) into raw bytes.
///
/// # Errors
///
/// Returns an error if the input contains invalid escape sequences.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            result.push(bytes[i]);
            i += 1;
            continue;
        }

        // Soft line break
        match bytes.get(i + 1..) {
            Some([b'\r', b'\n', ..]) => {
                i += 3;
                continue;
            }
            Some([b'\n', ..]) => {
                i += 2;
                continue;
            }
            _ => {}
        }

        // Hex encoded byte
        let hex = bytes
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .ok_or_else(|| Error::InvalidEncoding("Incomplete escape sequence".to_string()))?;
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
        result.push(byte);
        i += 3;
    }

    Ok(result)
}

/// Converts bytes in the given charset to a string.
///
/// UTF-8 and US-ASCII are decoded as UTF-8, the Latin-1 family maps each
/// byte to the code point of the same value. Unknown charsets fall back to
/// lossy UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: &str) -> String {
    // RFC 2231 allows a language suffix: "utf-8*en"
    let charset = charset
        .split_once('*')
        .map_or(charset, |(name, _)| name)
        .to_ascii_lowercase();

    match charset.as_str() {
        "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" | "windows-1252"
        | "cp1252" => bytes.iter().copied().map(char::from).collect(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// A parsed `=?charset?encoding?text?=` token.
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: &'a str,
    text: &'a str,
    /// Total length of the token in the source string.
    len: usize,
}

impl<'a> EncodedWord<'a> {
    /// Tries to parse an encoded word at the start of `input`.
    fn parse(input: &'a str) -> Option<Self> {
        let inner = input.strip_prefix("=?")?;
        let (charset, rest) = inner.split_once('?')?;
        let (encoding, rest) = rest.split_once('?')?;
        let end = rest.find("?=")?;
        let text = &rest[..end];

        if charset.is_empty() || encoding.len() != 1 || text.contains(char::is_whitespace) {
            return None;
        }

        Some(Self {
            charset,
            encoding,
            text,
            len: 2 + charset.len() + 1 + encoding.len() + 1 + end + 2,
        })
    }

    fn decode(&self) -> Result<String> {
        let bytes = match self.encoding {
            "B" | "b" => decode_base64(self.text)?,
            // Quoted-Printable with underscore for space
            "Q" | "q" => decode_quoted_printable(&self.text.replace('_', " "))?,
            other => {
                return Err(Error::InvalidEncoding(format!("Unknown encoding: {other}")));
            }
        };
        Ok(decode_charset(&bytes, self.charset))
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Plain text around encoded words is kept as-is. Whitespace that only
/// separates two encoded words is dropped, as RFC 2047 section 6.2 requires.
///
/// # Errors
///
/// Returns an error if an encoded word uses an unknown encoding or carries
/// invalid Base64 / Quoted-Printable data.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    // Whitespace seen since the last encoded word, held back until we know
    // whether another encoded word follows.
    let mut pending_gap: Option<&str> = None;

    while !rest.is_empty() {
        if let Some(word) = rest.starts_with("=?").then(|| EncodedWord::parse(rest)).flatten() {
            pending_gap = None;
            result.push_str(&word.decode()?);
            rest = &rest[word.len..];

            let gap_len = rest.len() - rest.trim_start().len();
            if gap_len > 0 {
                pending_gap = Some(&rest[..gap_len]);
                rest = &rest[gap_len..];
            }
            continue;
        }

        if let Some(gap) = pending_gap.take() {
            result.push_str(gap);
        }

        // Copy plain text up to the next candidate encoded word
        let skip = rest.chars().next().map_or(1, char::len_utf8);
        let next = rest[skip..].find("=?").map_or(rest.len(), |pos| pos + skip);
        result.push_str(&rest[..next]);
        rest = &rest[next..];
    }

    if let Some(gap) = pending_gap {
        result.push_str(gap);
    }

    Ok(result)
}
