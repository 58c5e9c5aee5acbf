//! # mailtriage-pop3
//!
//! An async POP3 client library implementing RFC 1939, with STLS (RFC 2595).
//!
//! ## Features
//!
//! - **Type-state connection management**: USER/PASS are only available in the
//!   authorization state, mailbox commands only after login
//! - **TLS support**: Both implicit TLS (port 995) and STLS
//! - **Timeouts**: Every command round trip is bounded by the I/O timeout
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailtriage_pop3::connection::{Config, connect};
//!
//! #[tokio::main]
//! async fn main() -> mailtriage_pop3::Result<()> {
//!     let config = Config::builder("pop.example.com").build();
//!     let client = connect(&config).await?;
//!     let mut client = client.login("user@example.com", "password").await?;
//!
//!     let stat = client.stat().await?;
//!     for msg in (1..=stat.count).rev() {
//!         let header = client.top(msg, 0).await?;
//!         println!("{}", String::from_utf8_lossy(&header));
//!     }
//!
//!     client.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! ```text
//! ┌───────────────┐
//! │ Authorization │ ─── login() ───→ Transaction ─── quit() ───→ (Update)
//! └───────────────┘
//!        │
//!        └─── stls() ───→ Authorization (TLS)
//! ```
//!
//! ## Modules
//!
//! - [`command`]: POP3 command builders
//! - [`connection`]: Connection management and type-state client
//! - [`parser`]: Status line and STAT parser
//! - [`types`]: Core POP3 types (replies, mailbox statistics)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{
    Authorization, Client, Config, ConfigBuilder, POP3_PORT, POP3S_PORT, Pop3Stream, Security,
    Transaction, connect,
};
pub use error::{Error, Result};
pub use types::{MailboxStat, Reply, Status};
