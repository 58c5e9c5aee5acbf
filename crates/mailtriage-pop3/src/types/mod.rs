//! Core POP3 types.

mod reply;
mod stat;

pub use reply::{Reply, Status};
pub use stat::MailboxStat;
