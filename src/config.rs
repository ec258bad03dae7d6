//! Configuration loading and management.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Picks the next nick to try after the server rejects the current one.
pub type NickCollideFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Client session configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Server name, reported in the `CLIENT_CONNECTED` announcement.
    pub server: String,
    /// Nick to register with.
    pub nick: String,
    /// Ident; defaults to the nick.
    #[serde(default)]
    pub user: String,
    /// Real name; defaults to the nick. The engine never registers on its
    /// own, so this is carried for the transport's `USER` line.
    #[serde(default)]
    pub name: String,
    /// Skip user/channel tracking; only keepalive, registration and nick
    /// collision handling stay active.
    #[serde(default)]
    pub disable_tracking: bool,
    /// Grace period between the welcome numeric and `CLIENT_CONNECTED`.
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,
    /// Query token sent with WHOX requests and expected back in replies.
    #[serde(default = "default_whox_query_tag")]
    pub whox_query_tag: String,
    #[serde(skip)]
    nick_collide: Option<NickCollideFn>,
}

fn default_connect_delay_ms() -> u64 {
    2000
}

fn default_whox_query_tag() -> String {
    "1".to_string()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("nick", &self.nick)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("disable_tracking", &self.disable_tracking)
            .field("connect_delay_ms", &self.connect_delay_ms)
            .field("whox_query_tag", &self.whox_query_tag)
            .field("nick_collide", &self.nick_collide.is_some())
            .finish()
    }
}

impl Config {
    /// Configuration with defaults for everything but server and nick.
    pub fn new(server: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            nick: nick.into(),
            user: String::new(),
            name: String::new(),
            disable_tracking: false,
            connect_delay_ms: default_connect_delay_ms(),
            whox_query_tag: default_whox_query_tag(),
            nick_collide: None,
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that would otherwise fail late, mid-session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.is_empty() {
            return Err(ConfigError::Invalid("server is required".into()));
        }
        if self.nick.is_empty() {
            return Err(ConfigError::Invalid("nick is required".into()));
        }
        let tag = &self.whox_query_tag;
        if tag.is_empty() || tag.len() > 3 || !tag.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Invalid(format!(
                "whox_query_tag must be 1-3 digits, got '{tag}'"
            )));
        }
        Ok(())
    }

    /// Install a custom nick collision strategy.
    pub fn with_nick_collide<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.nick_collide = Some(Arc::new(f));
        self
    }

    /// Next nick to try after `current` was refused. Appends `_` unless a
    /// strategy was installed.
    pub fn resolve_nick_collision(&self, current: &str) -> String {
        match &self.nick_collide {
            Some(f) => f(current),
            None => format!("{current}_"),
        }
    }

    /// Ident, falling back to the nick.
    pub fn ident(&self) -> &str {
        if self.user.is_empty() { &self.nick } else { &self.user }
    }

    /// Real name, falling back to the nick. Read by whoever writes the
    /// registration `USER` line.
    pub fn real_name(&self) -> &str {
        if self.name.is_empty() { &self.nick } else { &self.name }
    }

    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// WHOX field selector: type, channel, account, ident, host, nick, real name.
    pub fn whox_query(&self) -> String {
        format!("%tacuhnr,{}", self.whox_query_tag)
    }
}
