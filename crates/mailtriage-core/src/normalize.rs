//! Header normalization: raw header bytes to a [`HeaderRecord`].

use mailtriage_mime::Headers;
use tracing::warn;

use crate::Error;
use crate::record::{FROM, HeaderRecord, SENDER_ADDRESS, SUBJECT};

/// Parses a raw header block into a record.
///
/// Every field is decoded from RFC 2047 encoded words into plain text and
/// the `From` value is split into a display name and `Sender Address`.
/// `Index` is left unset for the caller.
///
/// Damaged input never fails the message. Unparseable lines are skipped
/// and undecodable values keep their raw form; both are logged.
#[must_use]
pub fn normalize(raw: &[u8]) -> HeaderRecord {
    let headers = Headers::parse(raw);
    if headers.skipped_lines() > 0 {
        warn!(
            "{}",
            Error::MalformedHeader(format!(
                "skipped {} unreadable header line(s)",
                headers.skipped_lines()
            ))
        );
    }

    let mut record = HeaderRecord::new();
    for (name, value) in headers.iter() {
        let decoded = Headers::decode_value(value).unwrap_or_else(|e| {
            warn!("{}", Error::MalformedHeader(format!("{name}: {e}")));
            value.to_string()
        });
        // Repeated names: the last occurrence wins
        record.set(name, decoded);
    }

    let sender = record.display_name().to_string();
    let (display_name, address) = split_sender(&sender);
    record.set(FROM, display_name);
    record.set(SENDER_ADDRESS, address);

    if record.get(SUBJECT).is_none() {
        record.set(SUBJECT, "");
    }

    record
}

/// Splits a decoded `From` value into `(display name, address)`.
///
/// `Name <addr>` and `"Name" <addr>` yield the name and the address between
/// the marker and the closing `>`. A leading `'` is treated like `"`. Values
/// without a marker are returned unchanged in both positions.
#[must_use]
pub fn split_sender(value: &str) -> (String, String) {
    let value = value.trim();

    let (body, marker) = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => (&value[1..], format!("{quote} <")),
        _ => (value, " <".to_string()),
    };

    match body.find(&marker) {
        Some(pos) => {
            let address = &body[pos + marker.len()..];
            let address = address.strip_suffix('>').unwrap_or(address);
            (body[..pos].to_string(), address.to_string())
        }
        None => (value.to_string(), value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    #[test]
    fn test_split_plain_name() {
        assert_eq!(
            split_sender("Jane Doe <jane@example.com>"),
            ("Jane Doe".to_string(), "jane@example.com".to_string())
        );
    }

    #[test]
    fn test_split_quoted_name() {
        assert_eq!(
            split_sender("\"Doe, Jane\" <jane@example.com>"),
            ("Doe, Jane".to_string(), "jane@example.com".to_string())
        );
        assert_eq!(
            split_sender("'Shop' <deals@shop.example>"),
            ("Shop".to_string(), "deals@shop.example".to_string())
        );
    }

    #[test]
    fn test_split_bare_address() {
        assert_eq!(
            split_sender("jane@example.com"),
            ("jane@example.com".to_string(), "jane@example.com".to_string())
        );
        assert_eq!(split_sender(""), (String::new(), String::new()));
    }

    #[test]
    fn test_split_missing_closing_bracket() {
        assert_eq!(
            split_sender("Jane <jane@exam"),
            ("Jane".to_string(), "jane@exam".to_string())
        );
    }

    #[test]
    fn test_normalize_decodes_and_splits() {
        let raw = concat!(
            "Return-Path: <bounce@news.example>\r\n",
            "From: =?utf-8?B?SMOpbMOobmU=?= <helene@news.example>\r\n",
            "Subject: =?utf-8?Q?Votre_commande?=\r\n",
            "List-Unsubscribe: <mailto:unsub@news.example>\r\n",
            "\r\n"
        );

        let record = normalize(raw.as_bytes());
        assert_eq!(record.display_name(), "Hélène");
        assert_eq!(record.sender_address(), "helene@news.example");
        assert_eq!(record.subject(), "Votre commande");
        assert!(record.get("List-Unsubscribe").is_some());
        assert_eq!(record.index(), None);
    }

    #[test]
    fn test_normalize_missing_from_and_subject() {
        let record = normalize(b"X-Mailer: test\r\n\r\n");
        assert_eq!(record.display_name(), "");
        assert_eq!(record.sender_address(), "");
        assert_eq!(record.subject(), "");
    }

    #[test]
    fn test_normalize_keeps_undecodable_value() {
        let raw = b"From: a@b.com\r\nSubject: =?utf-8?B?!!!?=\r\n";
        let record = normalize(raw);
        assert_eq!(record.subject(), "=?utf-8?B?!!!?=");
        assert_eq!(record.sender_address(), "a@b.com");
    }

    #[test]
    fn test_normalize_truncated_block() {
        let raw = b"From: Shop <shop@example.com>\r\nSubject: Your ord";
        let record = normalize(raw);
        assert_eq!(record.sender_address(), "shop@example.com");
        assert_eq!(record.subject(), "Your ord");
    }

    #[test]
    fn test_normalize_last_duplicate_wins() {
        let raw = b"Subject: one\r\nSubject: two\r\n";
        let record = normalize(raw);
        assert_eq!(record.get(SUBJECT), Some(&FieldValue::from("two")));
    }
}
