//! Flag validation against the command table.

use thiserror::Error;

use super::schema::{FlagKind, FlagDef, find_command};

/// Why a command line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// The first token is not a registered command.
    #[error("Unknown command: \"{0}\". Use \"help\" to see a list of available commands.")]
    UnknownCommand(String),

    /// A token is not a flag of the command.
    #[error("Unknown flag \"{flag}\" for command \"{command}\".")]
    UnknownFlag {
        /// Offending token.
        flag: String,
        /// Command being validated.
        command: String,
    },

    /// A value flag ended the line or was followed by another flag.
    #[error("Flag \"{0}\" requires a value.")]
    MissingValue(String),

    /// The same flag appeared twice.
    #[error("Flag \"{0}\" was given more than once.")]
    Duplicate(String),

    /// A value could not be read as an integer.
    #[error("Flag \"{flag}\" expects an integer, got \"{value}\".")]
    NotAnInteger {
        /// Flag name.
        flag: String,
        /// Token that followed it.
        value: String,
    },

    /// A positive value was zero.
    #[error("Flag \"{0}\" must be greater than zero.")]
    NotPositive(String),
}

/// A captured flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// A switch that was present.
    Present,
    /// The token that followed a value flag.
    Value(String),
}

/// Flags given for one invocation, in the order they were typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    entries: Vec<(&'static str, FlagValue)>,
}

impl FlagSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured value of a flag.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Returns true if the flag was given.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns a value flag as an integer.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            FlagValue::Value(v) => v.parse().ok(),
            FlagValue::Present => None,
        }
    }

    /// Number of captured flags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no flag was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, def: &'static FlagDef, value: FlagValue) -> Result<(), FlagError> {
        if self.contains(def.name) {
            return Err(FlagError::Duplicate(def.name.to_string()));
        }
        self.entries.push((def.name, value));
        Ok(())
    }
}

enum ParseState {
    ExpectFlag,
    ExpectValue(&'static FlagDef),
}

/// Checks `args` against the flags of `command` and records them in `flags`.
///
/// Tokens are consumed left to right. A value flag takes the next token,
/// which must not start with `-`. On error `flags` may hold the flags read
/// so far and must be discarded.
///
/// # Errors
///
/// Returns a [`FlagError`] describing the first violation.
pub fn validate_flags(command: &str, flags: &mut FlagSet, args: &[&str]) -> Result<(), FlagError> {
    let def =
        find_command(command).ok_or_else(|| FlagError::UnknownCommand(command.to_string()))?;
    let mut state = ParseState::ExpectFlag;

    for &token in args {
        state = match state {
            ParseState::ExpectFlag => {
                let flag = def.flag(token).ok_or_else(|| FlagError::UnknownFlag {
                    flag: token.to_string(),
                    command: command.to_string(),
                })?;
                if flag.kind.takes_value() {
                    ParseState::ExpectValue(flag)
                } else {
                    flags.insert(flag, FlagValue::Present)?;
                    ParseState::ExpectFlag
                }
            }
            ParseState::ExpectValue(flag) => {
                if token.starts_with('-') {
                    return Err(FlagError::MissingValue(flag.name.to_string()));
                }
                check_value(flag, token)?;
                flags.insert(flag, FlagValue::Value(token.to_string()))?;
                ParseState::ExpectFlag
            }
        };
    }

    match state {
        ParseState::ExpectFlag => Ok(()),
        ParseState::ExpectValue(flag) => Err(FlagError::MissingValue(flag.name.to_string())),
    }
}

fn check_value(flag: &FlagDef, token: &str) -> Result<(), FlagError> {
    let value: u32 = token.parse().map_err(|_| FlagError::NotAnInteger {
        flag: flag.name.to_string(),
        value: token.to_string(),
    })?;
    if flag.kind == FlagKind::PositiveInteger && value == 0 {
        return Err(FlagError::NotPositive(flag.name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn validate(command: &str, args: &[&str]) -> Result<FlagSet, FlagError> {
        let mut flags = FlagSet::new();
        validate_flags(command, &mut flags, args).map(|()| flags)
    }

    #[test]
    fn test_value_flag() {
        let flags = validate("cycle", &["-size", "50"]).unwrap();
        assert_eq!(flags.get("-size"), Some(&FlagValue::Value("50".into())));
        assert_eq!(flags.integer("-size"), Some(50));
        assert!(!flags.contains("-all"));
    }

    #[test]
    fn test_switch_flag() {
        let flags = validate("range", &["-all", "-from", "10"]).unwrap();
        assert_eq!(flags.get("-all"), Some(&FlagValue::Present));
        assert_eq!(flags.integer("-from"), Some(10));
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn test_no_flags() {
        assert!(validate("help", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_flag() {
        assert_eq!(
            validate("cycle", &["-bogus"]).unwrap_err().to_string(),
            "Unknown flag \"-bogus\" for command \"cycle\"."
        );
        // Flags of another command are not accepted
        assert!(matches!(
            validate("cycle", &["-from", "3"]),
            Err(FlagError::UnknownFlag { .. })
        ));
        assert!(matches!(
            validate("help", &["-all"]),
            Err(FlagError::UnknownFlag { .. })
        ));
    }

    #[test]
    fn test_stray_value() {
        assert!(matches!(
            validate("cycle", &["50"]),
            Err(FlagError::UnknownFlag { .. })
        ));
    }

    #[test]
    fn test_missing_value() {
        assert_eq!(
            validate("cycle", &["-size"]).unwrap_err(),
            FlagError::MissingValue("-size".into())
        );
        assert_eq!(
            validate("range", &["-from", "-to", "3"]).unwrap_err(),
            FlagError::MissingValue("-from".into())
        );
        // Negative numbers look like flags
        assert_eq!(
            validate("range", &["-to", "-5"]).unwrap_err(),
            FlagError::MissingValue("-to".into())
        );
    }

    #[test]
    fn test_duplicate() {
        assert_eq!(
            validate("cycle", &["-all", "-all"]).unwrap_err(),
            FlagError::Duplicate("-all".into())
        );
        assert_eq!(
            validate("range", &["-to", "1", "-to", "2"]).unwrap_err(),
            FlagError::Duplicate("-to".into())
        );
    }

    #[test]
    fn test_integer_checks() {
        assert_eq!(
            validate("cycle", &["-size", "ten"]).unwrap_err().to_string(),
            "Flag \"-size\" expects an integer, got \"ten\"."
        );
        assert_eq!(
            validate("cycle", &["-size", "0"]).unwrap_err().to_string(),
            "Flag \"-size\" must be greater than zero."
        );
        assert!(validate("range", &["-to", "0"]).is_ok());
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            validate("purge", &[]).unwrap_err().to_string(),
            "Unknown command: \"purge\". Use \"help\" to see a list of available commands."
        );
    }
}
