//! Server configuration, loaded once at startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::RngCore;
use serde::Deserialize;
use tracing::warn;

use crate::storage::JsonFileStore;

/// Which [`PlayerStore`](crate::storage::PlayerStore) backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Json,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind: String,

    /// Directory of player documents when `storage = "json"`.
    /// None = `~/.fitquest/players`
    pub data_dir: Option<PathBuf>,

    pub storage: StorageKind,

    /// Secret for signing bearer tokens. None = random per process.
    pub token_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            data_dir: None,
            storage: StorageKind::Json,
            token_secret: None,
        }
    }
}

impl Config {
    /// Reads a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> io::Result<Self> {
        toml::from_str(text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Applies `FITQUEST_*` environment overrides.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind) = lookup("FITQUEST_BIND") {
            self.bind = bind;
        }
        if let Some(dir) = lookup("FITQUEST_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(secret) = lookup("FITQUEST_TOKEN_SECRET") {
            self.token_secret = Some(secret);
        }
        if let Some(storage) = lookup("FITQUEST_STORAGE") {
            match storage.to_lowercase().as_str() {
                "json" => self.storage = StorageKind::Json,
                "memory" => self.storage = StorageKind::Memory,
                other => {
                    warn!(value = other, "unknown FITQUEST_STORAGE, keeping configured backend")
                }
            }
        }
        self
    }

    pub fn data_dir(&self) -> io::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => JsonFileStore::default_dir(),
        }
    }

    /// The configured token secret, or 32 random bytes when unset.
    pub fn token_secret_bytes(&self) -> Vec<u8> {
        match &self.token_secret {
            Some(secret) if !secret.is_empty() => secret.as_bytes().to_vec(),
            _ => {
                warn!("no token secret configured; tokens will not survive a restart");
                let mut bytes = vec![0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                bytes
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.storage, StorageKind::Json);
        assert!(config.token_secret.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("storage = \"memory\"\n").unwrap();
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_full_toml() {
        let config = Config::from_toml(
            r#"
            bind = "0.0.0.0:8080"
            data_dir = "/tmp/fitquest"
            storage = "json"
            token_secret = "s3cret"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/fitquest"));
        assert_eq!(config.token_secret_bytes(), b"s3cret".to_vec());
    }

    #[test]
    fn test_bad_toml_is_invalid_data() {
        let err = Config::from_toml("storage = \"postgres\"").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("FITQUEST_BIND", "127.0.0.1:9999"),
            ("FITQUEST_STORAGE", "MEMORY"),
            ("FITQUEST_TOKEN_SECRET", "abc"),
        ]
        .into_iter()
        .collect();
        let config = Config::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.bind, "127.0.0.1:9999");
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.token_secret.as_deref(), Some("abc"));
    }

    #[test]
    fn test_random_secret_when_unset() {
        let config = Config::default();
        let a = config.token_secret_bytes();
        let b = config.token_secret_bytes();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
