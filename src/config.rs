//! Connection settings for a [`Q3Client`](crate::Q3Client).

use crate::errors::{ConfigurationError, Result};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Delay charged to every command before the next one may be sent.
///
/// ioquake3 drops connectionless packets from an address that sends more than
/// a few per second, so this errs on the slow side.
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(150);

/// How long to wait for a reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

/// Where to find the server and how to talk to it.
///
/// The configuration cannot be changed once built.
///
/// # Examples
/// ```
/// use q3_rcon::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder("127.0.0.1", 27960)
///     .rcon_password("secret")
///     .timeout(Duration::from_secs(2))
///     .build()
///     .unwrap();
///
/// assert_eq!(config.rcon_password(), Some("secret"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    address: String,
    port: u16,
    rcon_password: Option<String>,
    rate_limit: Duration,
    timeout: Duration,
}

impl ClientConfig {
    /// Configuration with the default rate limit and timeout and no rcon.
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            rcon_password: None,
            rate_limit: DEFAULT_RATE_LIMIT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Start building a configuration for `address:port`.
    pub fn builder(address: impl Into<String>, port: u16) -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::new(address, port),
        }
    }

    /// Hostname or IP address of the server.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// UDP port of the server.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The rcon password, if rcon is enabled.
    pub fn rcon_password(&self) -> Option<&str> {
        self.rcon_password.as_deref()
    }

    /// Minimum spacing between two commands sent by the same client.
    pub fn rate_limit(&self) -> Duration {
        self.rate_limit
    }

    /// Deadline for a single reply.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Enable rcon. An empty password leaves rcon disabled.
    #[must_use]
    pub fn rcon_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.config.rcon_password = (!password.is_empty()).then_some(password);
        self
    }

    /// Override [`DEFAULT_RATE_LIMIT`]. Zero disables rate limiting.
    #[must_use]
    pub fn rate_limit(mut self, rate_limit: Duration) -> Self {
        self.config.rate_limit = rate_limit;
        self
    }

    /// Override [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Finish the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::ZeroTimeout`] if the timeout is zero.
    pub fn build(self) -> Result<ClientConfig> {
        if self.config.timeout.is_zero() {
            return Err(ConfigurationError::ZeroTimeout.into());
        }

        Ok(self.config)
    }
}

/// The shape handed over by whatever loads server configuration files.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClientConfig {
    address: String,
    port: u16,
    #[serde(default)]
    rcon_password: String,
    rate_limit_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

impl<'de> Deserialize<'de> for ClientConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawClientConfig::deserialize(deserializer)?;

        let mut builder =
            ClientConfig::builder(raw.address, raw.port).rcon_password(raw.rcon_password);
        if let Some(ms) = raw.rate_limit_ms {
            builder = builder.rate_limit(Duration::from_millis(ms));
        }
        if let Some(ms) = raw.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder.build().map_err(serde::de::Error::custom)
    }
}
