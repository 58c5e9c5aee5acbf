//! Password storage in the system keyring.
//!
//! Uses the platform's native credential storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager

use keyring::Entry;
use tracing::debug;

/// Service name used for keyring entries.
const SERVICE_NAME: &str = "mailtriage";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Keyring entry key for a POP3 login.
fn credential_key(username: &str, host: &str) -> String {
    format!("pop3_{username}@{host}")
}

/// Stores a POP3 password.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn store_password(username: &str, host: &str, password: &str) -> CredentialResult<()> {
    let entry = Entry::new(SERVICE_NAME, &credential_key(username, host))?;
    entry.set_password(password)?;
    debug!("Stored password for {username}@{host}");
    Ok(())
}

/// Retrieves a POP3 password, or `None` if none was stored.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn get_password(username: &str, host: &str) -> CredentialResult<Option<String>> {
    let entry = Entry::new(SERVICE_NAME, &credential_key(username, host))?;
    match entry.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => {
            debug!("No password stored for {username}@{host}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Removes a stored POP3 password. Missing entries are not an error.
///
/// # Errors
///
/// Returns an error if the keyring operation fails.
pub fn delete_password(username: &str, host: &str) -> CredentialResult<()> {
    let entry = Entry::new(SERVICE_NAME, &credential_key(username, host))?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => {
            debug!("Deleted password for {username}@{host}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_key() {
        assert_eq!(
            credential_key("me", "pop.example.com"),
            "pop3_me@pop.example.com"
        );
    }
}
