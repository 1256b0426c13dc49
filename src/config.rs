use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "RESTATIC_CONFIG";

/// Server settings.
///
/// Every field has a default, so a YAML file only needs the keys it changes:
///
/// ```yaml
/// listen_addr: "0.0.0.0:35000"
/// static_root: "www"
/// prefix: "/App"
/// read_timeout_ms: 5000
/// write_timeout_ms: 5000
/// max_body_bytes: 1048576
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Directory static files are served from
    pub static_root: PathBuf,
    /// Namespace prefix in front of every registered route
    pub prefix: String,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// Largest accepted `Content-Length`
    pub max_body_bytes: usize,
}

/// Per-connection resource bounds derived from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deadline for receiving a complete request
    pub read_timeout: Duration,
    /// Deadline for sending the whole response
    pub write_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:35000".to_string(),
            static_root: PathBuf::from("www"),
            prefix: "/App".to_string(),
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Config::default().limits()
    }
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// Reads the YAML file named by `RESTATIC_CONFIG` when set, then applies
    /// `LISTEN` and `STATIC_ROOT` on top.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with a custom variable lookup.
    pub fn load_with<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_ENV) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(listen_addr) = lookup("LISTEN") {
            cfg.listen_addr = listen_addr;
        }
        if let Some(static_root) = lookup("STATIC_ROOT") {
            cfg.static_root = PathBuf::from(static_root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("invalid YAML configuration")
    }

    pub fn limits(&self) -> Limits {
        Limits {
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            write_timeout: Duration::from_millis(self.write_timeout_ms),
            max_body_bytes: self.max_body_bytes,
        }
    }
}
