//! Configuration management for the chat server and client.
//!
//! All values have built-in defaults, so a config file is optional. When
//! present, `config.toml` is loaded from the working directory and individual
//! keys can be overridden through `EMBER_CHAT_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 33000;
const DEFAULT_BUFFER_SIZE: usize = 1024;
const DEFAULT_MAX_RETRIES: usize = 5;
const DEFAULT_RETRY_DELAY_SECS: u64 = 1;

/// Startup configuration shared by the server and client binaries.
///
/// The server uses `host`/`port` as its bind address and `buffer_size` as the
/// per-read cap; the client uses the same address to connect, plus
/// `max_retries` and `retry_delay_secs` for its bounded reconnect loop.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Bind/connect address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Maximum bytes accepted per socket read
    pub buffer_size: usize,

    /// Connect retries after the initial attempt (client only)
    pub max_retries: usize,

    /// Delay between connect attempts in seconds (client only)
    pub retry_delay_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
        }
    }
}

impl ChatConfig {
    /// Load configuration from defaults, an optional `config.toml`, and
    /// `EMBER_CHAT_*` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("buffer_size", DEFAULT_BUFFER_SIZE as i64)?
            .set_default("max_retries", DEFAULT_MAX_RETRIES as i64)?
            .set_default("retry_delay_secs", DEFAULT_RETRY_DELAY_SECS as i64)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("EMBER_CHAT").try_parsing(true))
            .build()?;

        let config: ChatConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Get host and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the connect retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.host.is_empty() {
            return Err(config::ConfigError::Message("host cannot be empty".into()));
        }

        if self.buffer_size == 0 {
            return Err(config::ConfigError::Message(
                "buffer_size must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}
