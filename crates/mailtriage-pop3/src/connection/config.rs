//! Where to connect and how the POP3 session is secured.

use std::time::Duration;

/// Plaintext POP3 port (RFC 1939), also used for STLS.
pub const POP3_PORT: u16 = 110;

/// POP3 over implicit TLS (RFC 8314).
pub const POP3S_PORT: u16 = 995;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const IO_TIMEOUT: Duration = Duration::from_secs(60);

/// How the connection is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// Plaintext for the whole session, password included.
    None,
    /// Plaintext greeting, then `STLS` before USER/PASS (RFC 2595).
    StartTls,
    /// TLS handshake right after the TCP connect.
    #[default]
    Implicit,
}

impl Security {
    /// Port used when none is configured.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        if self.handshake_on_connect() {
            POP3S_PORT
        } else {
            POP3_PORT
        }
    }

    /// True if TLS starts before the greeting is read.
    #[must_use]
    pub const fn handshake_on_connect(self) -> bool {
        matches!(self, Self::Implicit)
    }

    /// True if `STLS` must be sent after the greeting and before login.
    #[must_use]
    pub const fn needs_stls(self) -> bool {
        matches!(self, Self::StartTls)
    }

    /// True if credentials are sent over TLS.
    #[must_use]
    pub const fn is_encrypted(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host name, also used for certificate verification.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Connection protection.
    pub security: Security,
    /// Limit for the TCP connect and the implicit TLS handshake.
    pub connect_timeout: Duration,
    /// Limit for each command round trip once connected.
    pub io_timeout: Duration,
}

impl Config {
    /// Starts a configuration for `host`: implicit TLS on 995, 30s connect
    /// and 60s I/O limits.
    #[must_use]
    pub fn builder(host: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            host: host.into(),
            port: None,
            security: Security::default(),
            connect_timeout: CONNECT_TIMEOUT,
            io_timeout: IO_TIMEOUT,
        }
    }

    /// `host:port` as passed to the TCP connect.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for [`Config`]. The port follows the security mode unless set.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    host: String,
    port: Option<u16>,
    security: Security,
    connect_timeout: Duration,
    io_timeout: Duration,
}

impl ConfigBuilder {
    /// Overrides the well-known port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Selects the connection protection.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Uses one limit for connecting and for every round trip.
    #[must_use]
    pub const fn timeout(mut self, limit: Duration) -> Self {
        self.connect_timeout = limit;
        self.io_timeout = limit;
        self
    }

    /// Resolves the port and returns the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            port: self.port.unwrap_or(self.security.default_port()),
            host: self.host,
            security: self.security,
            connect_timeout: self.connect_timeout,
            io_timeout: self.io_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starttls_stays_on_plain_port() {
        let config = Config::builder("pop.example.com")
            .security(Security::StartTls)
            .build();
        assert_eq!(config.port, POP3_PORT);
        assert!(config.security.needs_stls());
        assert!(!config.security.handshake_on_connect());
        assert!(config.security.is_encrypted());
    }

    #[test]
    fn test_implicit_tls_is_pop3s() {
        let config = Config::builder("pop.example.com").build();
        assert_eq!(config.security, Security::Implicit);
        assert_eq!(config.address(), "pop.example.com:995");
        assert!(config.security.handshake_on_connect());
        assert!(!config.security.needs_stls());
    }

    #[test]
    fn test_plaintext_sends_password_in_clear() {
        let security = Security::None;
        assert_eq!(security.default_port(), POP3_PORT);
        assert!(!security.needs_stls());
        assert!(!security.is_encrypted());
    }

    #[test]
    fn test_explicit_port_wins_over_mode() {
        let config = Config::builder("localhost")
            .security(Security::StartTls)
            .port(1110)
            .build();
        assert_eq!(config.address(), "localhost:1110");
        assert!(config.security.needs_stls());
    }

    #[test]
    fn test_single_timeout_bounds_both_phases() {
        let limit = Duration::from_secs(7);
        let config = Config::builder("localhost").timeout(limit).build();
        assert_eq!(config.connect_timeout, limit);
        assert_eq!(config.io_timeout, limit);

        let defaults = Config::builder("localhost").build();
        assert!(defaults.connect_timeout < defaults.io_timeout);
    }
}
