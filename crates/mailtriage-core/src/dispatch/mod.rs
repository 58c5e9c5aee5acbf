//! Command line dispatch.
//!
//! A line typed at the prompt goes through three steps:
//!
//! 1. It is split on whitespace; an empty line is ignored.
//! 2. The first token selects a command from [`COMMANDS`] and the rest are
//!    checked by [`validate_flags`]. Any violation rejects the whole line.
//! 3. Absent flags are filled from their defaults and the result becomes a
//!    typed [`Invocation`] for the session to execute.

mod flags;
mod schema;

pub use flags::{FlagError, FlagSet, FlagValue, validate_flags};
pub use schema::{
    COMMANDS, CommandKind, CommandDef, FlagDefault, FlagKind, FlagDef, find_command, help_text,
};

/// Values that absent flags default to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    /// Batch size for `cycle`.
    pub batch_size: u32,
    /// Messages in the mailbox, used by `range -from`.
    pub mailbox_size: u32,
}

/// A validated command with every flag resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// Print the command table.
    Help,
    /// Walk the mailbox in batches of `size`.
    Cycle {
        /// Messages per batch.
        size: u32,
        /// Show every message instead of probable spam only.
        all: bool,
    },
    /// Process `from ..= to + 1`.
    Range {
        /// Highest index as typed, before swapping.
        from: u32,
        /// Exclusive lower bound as typed, before swapping.
        to: u32,
        /// Show every message instead of probable spam only.
        all: bool,
    },
    /// Commit and leave.
    Quit,
}

impl FlagSet {
    fn resolve(&self, def: &CommandDef, name: &str, defaults: Defaults) -> u32 {
        self.integer(name).unwrap_or_else(|| {
            match def.flag(name).map_or(FlagDefault::None, |f| f.default) {
                FlagDefault::Value(v) => v,
                FlagDefault::BatchSize => defaults.batch_size,
                FlagDefault::MailboxSize => defaults.mailbox_size,
                FlagDefault::None => 0,
            }
        })
    }
}

/// Parses one prompt line. Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns a [`FlagError`] if the command or any flag is rejected.
pub fn parse_line(line: &str, defaults: Defaults) -> Result<Option<Invocation>, FlagError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let def = find_command(name).ok_or_else(|| FlagError::UnknownCommand(name.to_string()))?;
    let mut flags = FlagSet::new();
    validate_flags(name, &mut flags, args)?;

    let all = flags.contains("-all");
    let invocation = match def.kind {
        CommandKind::Help => Invocation::Help,
        CommandKind::Quit => Invocation::Quit,
        CommandKind::Cycle => Invocation::Cycle {
            size: flags.resolve(def, "-size", defaults),
            all,
        },
        CommandKind::Range => Invocation::Range {
            from: flags.resolve(def, "-from", defaults),
            to: flags.resolve(def, "-to", defaults),
            all,
        },
    };
    Ok(Some(invocation))
}
