//! JSON configuration file: server credentials and triage preferences.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credentials;
use crate::triage::SenderRules;
use crate::{Error, Result};

/// Environment variable that overrides the configuration path.
pub const CONFIG_ENV: &str = "MAILTRIAGE_CONFIG";

/// Batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: u32 = 100;

/// Connection security, as written in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    /// Plaintext.
    None,
    /// Plaintext upgraded with STLS.
    StartTls,
    /// TLS from the first byte.
    #[default]
    Implicit,
}

impl From<SecurityMode> for mailtriage_pop3::Security {
    fn from(mode: SecurityMode) -> Self {
        match mode {
            SecurityMode::None => Self::None,
            SecurityMode::StartTls => Self::StartTls,
            SecurityMode::Implicit => Self::Implicit,
        }
    }
}

/// Where and as whom to log in. The password is never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// POP3 server host name.
    pub pop_domain: String,
    /// Login name.
    pub username: String,
    /// Port; the default for `security` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Connection security.
    #[serde(default)]
    pub security: SecurityMode,
}

/// Triage preferences. Every entry is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    /// Sender patterns treated as probable spam.
    pub spam_senders: Vec<String>,
    /// Sender patterns that are never spam.
    pub safe_senders: Vec<String>,
    /// Show and delete only probable spam unless `-all` is given.
    pub show_spam_only: bool,
    /// Default `cycle -size`.
    pub batch_size: u32,
    /// Column width overrides by field name.
    pub column_widths: HashMap<String, usize>,
    /// Width of boolean cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bool_width: Option<usize>,
    /// Per-request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Store the password in the system keyring after a successful login.
    pub remember_password: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            spam_senders: Vec::new(),
            safe_senders: Vec::new(),
            show_spam_only: true,
            batch_size: DEFAULT_BATCH_SIZE,
            column_widths: HashMap::new(),
            bool_width: None,
            timeout_secs: None,
            remember_password: false,
        }
    }
}

impl Prefs {
    /// Sender rules as configured.
    #[must_use]
    pub fn rules(&self) -> SenderRules {
        SenderRules {
            spam: self.spam_senders.clone(),
            safe: self.safe_senders.clone(),
        }
    }
}

/// Contents of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Server and login name.
    pub credentials: Credentials,
    /// Triage preferences.
    #[serde(default)]
    pub prefs: Prefs,
}

impl Config {
    /// Creates a configuration with default preferences.
    #[must_use]
    pub fn new(pop_domain: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                pop_domain: pop_domain.into(),
                username: username.into(),
                port: None,
                security: SecurityMode::default(),
            },
            prefs: Prefs::default(),
        }
    }

    /// Path of the configuration file: `$MAILTRIAGE_CONFIG` if set, else
    /// `mailtriage/config.json` under the platform config directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailtriage")
            .join("config.json")
    }

    /// Reads and validates the file. Returns `Ok(None)` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds invalid JSON or
    /// values.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Writes the file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.credentials.pop_domain.trim().is_empty() {
            return Err(Error::Config("credentials.pop_domain is empty".into()));
        }
        if self.prefs.batch_size == 0 {
            return Err(Error::Config("prefs.batch_size must be greater than zero".into()));
        }
        Ok(())
    }

    /// Spam and safe sender rules; empty when not configured.
    #[must_use]
    pub fn rules(&self) -> SenderRules {
        self.prefs.rules()
    }

    /// Password kept in the system keyring for this login, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if the keyring cannot be queried.
    pub fn stored_password(&self) -> Result<Option<String>> {
        let creds = &self.credentials;
        Ok(credentials::get_password(&creds.username, &creds.pop_domain)?)
    }

    /// Saves `secret` in the system keyring for this login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if the keyring rejects the entry.
    pub fn store_password(&self, secret: &str) -> Result<()> {
        let creds = &self.credentials;
        Ok(credentials::store_password(&creds.username, &creds.pop_domain, secret)?)
    }

    /// Removes this login's keyring entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credential`] if the keyring cannot be updated.
    pub fn forget_password(&self) -> Result<()> {
        let creds = &self.credentials;
        Ok(credentials::delete_password(&creds.username, &creds.pop_domain)?)
    }

    /// Connection settings for the POP3 client.
    #[must_use]
    pub fn pop3_config(&self) -> mailtriage_pop3::Config {
        let mut builder = mailtriage_pop3::Config::builder(&self.credentials.pop_domain)
            .security(self.credentials.security.into());
        if let Some(port) = self.credentials.port {
            builder = builder.port(port);
        }
        if let Some(secs) = self.prefs.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }
}
