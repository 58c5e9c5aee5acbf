//! First-run configuration and password lookup.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, bail};
use mailtriage_core::Config;
use tracing::{info, warn};

/// A password and where it came from.
pub struct Password {
    /// The secret itself.
    pub secret: String,
    /// True if it was read from the keyring rather than typed.
    pub from_keyring: bool,
}

/// Loads the configuration, asking for server and login name and writing
/// the file if it does not exist yet.
pub async fn load_or_create(path: &Path) -> anyhow::Result<Config> {
    if let Some(config) = Config::load(path)
        .await
        .with_context(|| format!("Could not read configuration at {}", path.display()))?
    {
        info!("Loaded configuration from {}", path.display());
        return Ok(config);
    }

    let host = ask("Enter the host name of your POP mail server: ")?;
    let username = ask("Enter your username: ")?;
    if host.is_empty() || username.is_empty() {
        bail!("A host name and a username are required");
    }

    let config = Config::new(host, username);
    config
        .save(path)
        .await
        .with_context(|| format!("Could not write configuration to {}", path.display()))?;
    println!("Configuration saved to {}", path.display());
    Ok(config)
}

/// Returns the stored password, or prompts for one without echo.
pub fn password(config: &Config) -> anyhow::Result<Password> {
    match config.stored_password() {
        Ok(Some(secret)) => {
            info!("Using password from the system keyring");
            return Ok(Password {
                secret,
                from_keyring: true,
            });
        }
        Ok(None) => {}
        Err(e) => warn!("Keyring unavailable, asking for the password: {e}"),
    }

    let secret =
        rpassword::prompt_password("Enter your password: ").context("Could not read password")?;
    Ok(Password {
        secret,
        from_keyring: false,
    })
}

/// Saves a password that just worked, if the configuration asks for it.
pub fn remember(config: &Config, password: &Password) {
    if !config.prefs.remember_password || password.from_keyring {
        return;
    }
    if let Err(e) = config.store_password(&password.secret) {
        warn!("Could not store the password in the keyring: {e}");
    }
}

/// Drops a stored password the server refused.
pub fn forget(config: &Config, password: &Password) {
    if !password.from_keyring {
        return;
    }
    if let Err(e) = config.forget_password() {
        warn!("Could not remove the stale keyring entry: {e}");
    }
}

fn ask(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("Input closed before setup finished");
    }
    Ok(line.trim().to_string())
}
