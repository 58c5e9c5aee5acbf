//! Spam classification of header records.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::matcher::SenderPattern;
use crate::record::HeaderRecord;
use crate::{Error, Result};

/// Prefix of mailing-list header names (`List-Unsubscribe`, `List-Id`, ...).
const LIST_HEADER_PREFIX: &str = "List";

/// Subject fragment that marks a message as a probable purchase.
const ORDER_MARKER: &str = "order";

/// Sender rules as written in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderRules {
    /// Patterns whose senders are probable spam.
    #[serde(default)]
    pub spam: Vec<String>,
    /// Patterns whose senders are never spam.
    #[serde(default)]
    pub safe: Vec<String>,
}

/// Why a record ended up with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No rule fired.
    Clean,
    /// A mailing-list header was present.
    MailingList,
    /// A spam rule matched the sender.
    SpamSender(String),
    /// A safe rule matched the sender and cleared any spam mark.
    SafeSender(String),
}

impl Verdict {
    /// Returns true if the verdict marks the message as spam.
    #[must_use]
    pub const fn is_spam(&self) -> bool {
        matches!(self, Self::MailingList | Self::SpamSender(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => f.write_str("no rule matched"),
            Self::MailingList => f.write_str("mailing-list header"),
            Self::SpamSender(p) => write!(f, "spam rule {p}"),
            Self::SafeSender(p) => write!(f, "safe rule {p}"),
        }
    }
}

/// Applies the mailing-list heuristic and the sender rules.
///
/// Rules are compiled once and never change during a session.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    spam: Vec<SenderPattern>,
    safe: Vec<SenderPattern>,
}

impl Classifier {
    /// Compiles both rule lists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a pattern cannot be compiled.
    pub fn new(rules: &SenderRules) -> Result<Self> {
        Ok(Self {
            spam: compile(&rules.spam)?,
            safe: compile(&rules.safe)?,
        })
    }

    /// Number of spam and safe rules.
    #[must_use]
    pub fn rule_counts(&self) -> (usize, usize) {
        (self.spam.len(), self.safe.len())
    }

    /// Sets `Probable Spam` on the record and returns the reason.
    pub fn classify(&self, record: &mut HeaderRecord) -> Verdict {
        let mut verdict = Verdict::Clean;

        if record.names().any(|name| name.starts_with(LIST_HEADER_PREFIX)) {
            verdict = Verdict::MailingList;
        }

        let address = record.sender_address();
        if let Some(rule) = self.spam.iter().find(|p| p.is_match(address)) {
            verdict = Verdict::SpamSender(rule.to_string());
        }
        if let Some(rule) = self.safe.iter().find(|p| p.is_match(address)) {
            verdict = Verdict::SafeSender(rule.to_string());
        }

        debug!("{address:?}: {verdict}");
        record.set_probable_spam(verdict.is_spam());
        verdict
    }
}

fn compile(patterns: &[String]) -> Result<Vec<SenderPattern>> {
    patterns
        .iter()
        .map(|p| {
            SenderPattern::new(p).map_err(|e| Error::Config(format!("sender rule {p:?}: {e}")))
        })
        .collect()
}

/// Returns true if the subject suggests an order (case-insensitive).
///
/// Membership in the order set is informational; it never changes the spam
/// classification.
#[must_use]
pub fn is_order(record: &HeaderRecord) -> bool {
    record.subject().to_lowercase().contains(ORDER_MARKER)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::record::{SENDER_ADDRESS, SUBJECT};

    fn record(address: &str, subject: &str) -> HeaderRecord {
        let mut record = HeaderRecord::new();
        record.set(SENDER_ADDRESS, address);
        record.set(SUBJECT, subject);
        record
    }

    fn classifier(spam: &[&str], safe: &[&str]) -> Classifier {
        Classifier::new(&SenderRules {
            spam: spam.iter().map(ToString::to_string).collect(),
            safe: safe.iter().map(ToString::to_string).collect(),
        })
        .unwrap()
    }

    #[test]
    fn test_defaults_to_not_spam() {
        let mut rec = record("friend@example.com", "hi");
        let verdict = Classifier::default().classify(&mut rec);
        assert_eq!(verdict, Verdict::Clean);
        assert!(!rec.probable_spam());
    }

    #[test]
    fn test_list_header_with_empty_rules() {
        let mut rec = record("news@example.com", "weekly");
        rec.set("List-Unsubscribe", "<mailto:u@example.com>");

        let verdict = Classifier::default().classify(&mut rec);
        assert_eq!(verdict, Verdict::MailingList);
        assert!(rec.probable_spam());
    }

    #[test]
    fn test_list_prefix_is_case_sensitive() {
        let mut rec = record("news@example.com", "weekly");
        rec.set("list-id", "lowercase");
        assert!(!Classifier::default().classify(&mut rec).is_spam());
    }

    #[test]
    fn test_spam_rule_first_match() {
        let c = classifier(&["*@deals.example", "promo*"], &[]);
        let mut rec = record("promo@deals.example", "sale");

        let verdict = c.classify(&mut rec);
        assert_eq!(verdict, Verdict::SpamSender("*@deals.example".into()));
        assert!(rec.probable_spam());
    }

    #[test]
    fn test_safe_rule_overrides_spam_rule() {
        let c = classifier(&["*@shop.example"], &["receipts@shop.example"]);
        let mut rec = record("receipts@shop.example", "Your receipt");

        let verdict = c.classify(&mut rec);
        assert_eq!(verdict, Verdict::SafeSender("receipts@shop.example".into()));
        assert!(!rec.probable_spam());
    }

    #[test]
    fn test_safe_rule_overrides_regardless_of_listing_order() {
        // The same pattern listed as both spam and safe
        let c = classifier(&["*@x.example"], &["*@x.example"]);
        let mut rec = record("a@x.example", "");
        c.classify(&mut rec);
        assert!(!rec.probable_spam());
    }

    #[test]
    fn test_safe_rule_overrides_list_header() {
        let c = classifier(&[], &["club@*"]);
        let mut rec = record("club@books.example", "");
        rec.set("List-Id", "<books.example>");
        c.classify(&mut rec);
        assert!(!rec.probable_spam());
    }

    #[test]
    fn test_reclassify_resets_flag() {
        let mut rec = record("a@spam.example", "");
        classifier(&["*@spam.example"], &[]).classify(&mut rec);
        assert!(rec.probable_spam());

        Classifier::default().classify(&mut rec);
        assert!(!rec.probable_spam());
    }

    #[test]
    fn test_is_order() {
        assert!(is_order(&record("", "Your ORDER has shipped")));
        assert!(is_order(&record("", "Reorder now")));
        assert!(!is_order(&record("", "Your package")));
    }

    #[test]
    fn test_order_does_not_change_classification() {
        let c = classifier(&["*@shop.example"], &[]);
        let mut rec = record("a@shop.example", "Order #1234 confirmed");
        c.classify(&mut rec);
        assert!(is_order(&rec));
        assert!(rec.probable_spam());
    }

    #[test]
    fn test_rule_counts() {
        assert_eq!(classifier(&["a", "b"], &["c"]).rule_counts(), (2, 1));
    }
}
