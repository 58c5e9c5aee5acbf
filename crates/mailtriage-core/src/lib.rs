//! # mailtriage-core
//!
//! Classification and batching engine for the `mailtriage` POP3 client.
//!
//! This crate provides:
//! - Header normalization into flat [`HeaderRecord`]s
//! - Wildcard sender rules with a safe-sender override
//! - Descending batch windows over the mailbox
//! - Fixed-width table rendering
//! - The command dispatcher and the interactive [`Session`]
//! - Configuration and keyring-backed credentials

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod credentials;
pub mod dispatch;
mod error;
pub mod normalize;
pub mod record;
pub mod render;
pub mod service;
pub mod session;
pub mod triage;

pub use batch::{Batch, Window, cyclic};
pub use config::{Config, Credentials, Prefs, SecurityMode};
pub use credentials::{CredentialError, CredentialResult};
pub use dispatch::{FlagError, FlagSet, Invocation, parse_line, validate_flags};
pub use error::{Error, Result};
pub use normalize::{normalize, split_sender};
pub use record::{FieldValue, HeaderRecord};
pub use render::{ColumnWidths, TableRenderer, truncate};
pub use service::{Mailbox, Pop3Mailbox, connect_and_login};
pub use session::{Outcome, Session, SessionOptions};
pub use triage::{Classifier, SenderPattern, SenderRules, Verdict, is_order, matches};
