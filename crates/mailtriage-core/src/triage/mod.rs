//! Email triage - sender rules and spam classification.
//!
//! This module provides:
//! - **Sender patterns**: `*` wildcards over sender addresses
//! - **Classifier**: Mailing-list heuristic, spam rules, safe-sender override
//! - **Order protection**: Messages that look like purchases are surfaced
//!   before a batch is deleted
//!
//! # Rule evaluation
//!
//! 1. Any header whose name starts with `List` marks the message as spam
//! 2. The first spam rule matching the sender address marks it as spam
//! 3. The first safe rule matching the sender address clears the mark,
//!    whatever happened in steps 1 and 2
//!
//! # Example
//!
//! ```ignore
//! use mailtriage_core::triage::{Classifier, SenderRules};
//!
//! let rules = SenderRules {
//!     spam: vec!["*@deals.example".into()],
//!     safe: vec!["receipts@deals.example".into()],
//! };
//! let classifier = Classifier::new(&rules)?;
//!
//! let verdict = classifier.classify(&mut record);
//! if record.probable_spam() {
//!     println!("spam: {verdict}");
//! }
//! ```

mod classifier;
mod matcher;

pub use classifier::{Classifier, SenderRules, Verdict, is_order};
pub use matcher::{SenderPattern, matches};
