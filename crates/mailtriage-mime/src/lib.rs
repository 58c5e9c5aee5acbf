//! # mailtriage-mime
//!
//! Header block parsing and decoding for email triage.
//!
//! ## Features
//!
//! - **Header parsing**: Lenient, case-preserving, order-preserving parsing of
//!   a raw header block (as returned by POP3 `TOP n 0`)
//! - **Decoding**: Base64, Quoted-Printable, RFC 2047 encoded words
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailtriage_mime::Headers;
//!
//! let raw = b"From: =?utf-8?B?SMOpbMOobmU=?= <helene@example.com>\r\n\
//!             Subject: Hello\r\n\r\n";
//!
//! let headers = Headers::parse(raw);
//! for (name, value) in headers.iter() {
//!     println!("{name}: {}", Headers::decode_value(value)?);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod header;

pub mod encoding;

pub use error::{Error, Result};
pub use header::Headers;
