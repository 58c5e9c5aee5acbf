//! The static command table.

/// Where a flag's value comes from when the operator leaves it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagDefault {
    /// No default; the flag is absent.
    None,
    /// A fixed integer.
    Value(u32),
    /// The configured batch size.
    BatchSize,
    /// The number of messages in the mailbox.
    MailboxSize,
}

/// What a flag accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Presence only.
    Switch,
    /// A non-negative integer.
    Integer,
    /// An integer greater than zero.
    PositiveInteger,
}

impl FlagKind {
    /// Returns true if the flag consumes the following token.
    #[must_use]
    pub const fn takes_value(self) -> bool {
        !matches!(self, Self::Switch)
    }
}

/// One named flag of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagDef {
    /// Flag name including the leading dash.
    pub name: &'static str,
    /// One-line description for `help`.
    pub description: &'static str,
    /// Accepted value.
    pub kind: FlagKind,
    /// Value used when the flag is absent.
    pub default: FlagDefault,
}

/// What a command does once its flags are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Print the command table.
    Help,
    /// Walk the whole mailbox batch by batch.
    Cycle,
    /// Process one explicit index range.
    Range,
    /// Commit deletions and leave.
    Quit,
}

/// One registered command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDef {
    /// Name typed at the prompt.
    pub name: &'static str,
    /// Other accepted names.
    pub aliases: &'static [&'static str],
    /// One-line description for `help`.
    pub description: &'static str,
    /// Handler selector.
    pub kind: CommandKind,
    /// Accepted flags.
    pub flags: &'static [FlagDef],
}

impl CommandDef {
    /// Looks up one of this command's flags.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&'static FlagDef> {
        self.flags.iter().find(|f| f.name == name)
    }
}

const ALL_FLAG: FlagDef = FlagDef {
    name: "-all",
    description: "show and delete every message, not only probable spam",
    kind: FlagKind::Switch,
    default: FlagDefault::None,
};

/// Every command the prompt accepts.
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "help",
        aliases: &[],
        description: "list the available commands and their flags",
        kind: CommandKind::Help,
        flags: &[],
    },
    CommandDef {
        name: "cycle",
        aliases: &[],
        description: "go through the whole mailbox in batches, newest first",
        kind: CommandKind::Cycle,
        flags: &[
            FlagDef {
                name: "-size",
                description: "number of messages per batch",
                kind: FlagKind::PositiveInteger,
                default: FlagDefault::BatchSize,
            },
            ALL_FLAG,
        ],
    },
    CommandDef {
        name: "range",
        aliases: &[],
        description: "process the messages between two indices as one batch",
        kind: CommandKind::Range,
        flags: &[
            FlagDef {
                name: "-from",
                description: "highest index, inclusive",
                kind: FlagKind::Integer,
                default: FlagDefault::MailboxSize,
            },
            FlagDef {
                name: "-to",
                description: "lowest index, exclusive",
                kind: FlagKind::Integer,
                default: FlagDefault::Value(0),
            },
            ALL_FLAG,
        ],
    },
    CommandDef {
        name: "quit",
        aliases: &["exit"],
        description: "apply confirmed deletions and leave",
        kind: CommandKind::Quit,
        flags: &[],
    },
];

/// Finds a command by name or alias.
#[must_use]
pub fn find_command(name: &str) -> Option<&'static CommandDef> {
    COMMANDS
        .iter()
        .find(|c| c.name == name || c.aliases.contains(&name))
}

/// Renders the command table for `help`.
#[must_use]
pub fn help_text() -> String {
    let mut text = String::from("Available commands:\n");
    for command in COMMANDS {
        text.push_str(&format!("  {:<8}{}\n", command.name, command.description));
        for flag in command.flags {
            let value = if flag.kind.takes_value() { " <int>" } else { "" };
            let usage = format!("{}{value}", flag.name);
            let default = match flag.default {
                FlagDefault::None => String::new(),
                FlagDefault::Value(v) => format!(" (default {v})"),
                FlagDefault::BatchSize => " (default: configured batch size)".to_string(),
                FlagDefault::MailboxSize => " (default: mailbox size)".to_string(),
            };
            text.push_str(&format!("      {usage:<12}{}{default}\n", flag.description));
        }
    }
    text
}
