//! Header records: one flat field mapping per message.

use std::fmt;

/// Field holding the message sequence number.
pub const INDEX: &str = "Index";
/// Field holding the sender display name.
pub const FROM: &str = "From";
/// Field holding the bare sender address.
pub const SENDER_ADDRESS: &str = "Sender Address";
/// Field holding the decoded subject.
pub const SUBJECT: &str = "Subject";
/// Field holding the spam classification.
pub const PROBABLE_SPAM: &str = "Probable Spam";

/// Value of a header record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Decoded header text.
    Text(String),
    /// Derived integer (the message index).
    Integer(u64),
    /// Derived flag (the spam classification).
    Flag(bool),
}

impl FieldValue {
    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true for flag values.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self, Self::Flag(_))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
            // Matches the capitalised spelling operators see in the table
            Self::Flag(true) => f.write_str("True"),
            Self::Flag(false) => f.write_str("False"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(u64::from(value))
    }
}

/// All fields known about one message during a batch pass.
///
/// Field names are case-sensitive and keep the order in which they were
/// first set. Setting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderRecord {
    fields: Vec<(String, FieldValue)>,
}

impl HeaderRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Gets a field by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterates over field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Iterates over all fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    fn text(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Message sequence number, once the caller has assigned it.
    #[must_use]
    pub fn index(&self) -> Option<u32> {
        match self.get(INDEX) {
            Some(FieldValue::Integer(n)) => u32::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Assigns the message sequence number.
    pub fn set_index(&mut self, index: u32) {
        self.set(INDEX, index);
    }

    /// Sender display name (the `From` field after address extraction).
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.text(FROM)
    }

    /// Bare sender address.
    #[must_use]
    pub fn sender_address(&self) -> &str {
        self.text(SENDER_ADDRESS)
    }

    /// Decoded subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.text(SUBJECT)
    }

    /// Spam classification; false until a classifier has run.
    #[must_use]
    pub fn probable_spam(&self) -> bool {
        matches!(self.get(PROBABLE_SPAM), Some(FieldValue::Flag(true)))
    }

    /// Records the spam classification.
    pub fn set_probable_spam(&mut self, spam: bool) {
        self.set(PROBABLE_SPAM, spam);
    }
}
