//! Header block handling.

use crate::encoding::decode_rfc2047;
use crate::error::Result;
use std::fmt;

/// Collection of email headers.
///
/// Names keep the case they were delivered with and entries keep their wire
/// order, including repeated names such as `Received`.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: Vec<(String, String)>,
    skipped_lines: usize,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Gets the first value for a header, matching the name exactly.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Gets the first value for a header, ignoring ASCII case in the name.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns an iterator over all headers in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of header entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if no header was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Number of lines that could not be read as a header or a continuation.
    #[must_use]
    pub const fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Parses headers from a raw header block.
    ///
    /// Headers are in the format:
    /// ```text
    /// Header-Name: value
    ///  continuation
    /// ```
    ///
    /// Parsing stops at the first empty line and is lenient. Lines that are
    /// neither a header nor a continuation are counted in
    /// [`Headers::skipped_lines`] and ignored. A block cut off mid-header
    /// keeps everything read up to that point.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let mut headers = Self::new();
        let mut current_name: Option<String> = None;
        let mut current_value = String::new();

        for line in text.lines() {
            if line.is_empty() {
                break;
            }

            // Check for continuation line (starts with space or tab)
            if line.starts_with(' ') || line.starts_with('\t') {
                if current_name.is_some() {
                    current_value.push(' ');
                    current_value.push_str(line.trim());
                } else {
                    headers.skipped_lines += 1;
                }
                continue;
            }

            // Save previous header if exists
            if let Some(name) = current_name.take() {
                headers.add(name, current_value.trim());
                current_value.clear();
            }

            match line.split_once(':') {
                Some((name, value)) if is_field_name(name) => {
                    current_name = Some(name.to_string());
                    current_value = value.trim().to_string();
                }
                _ => headers.skipped_lines += 1,
            }
        }

        // Save last header if we didn't hit an empty line
        if let Some(name) = current_name {
            headers.add(name, current_value.trim());
        }

        headers
    }

    /// Decodes a header value from RFC 2047 if encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_value(value: &str) -> Result<String> {
        decode_rfc2047(value)
    }
}

/// RFC 5322 field names are printable ASCII without spaces or colons.
fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic() && b != b':')
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.headers {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
