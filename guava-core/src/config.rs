//! Configuration management
//!
//! Settings live in settings.json inside the guava directory:
//! ```json
//! {
//!   "app": { "storage": "duckdb", "signInLatencyMs": 1000, "uploadLatencyMs": 2000 }
//! }
//! ```
//! Keys the CLI does not manage are preserved on save.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::demo::DEFAULT_SIGN_IN_LATENCY;
use crate::domain::result::Error;
use crate::services::DEFAULT_UPLOAD_LATENCY;

/// Which key-value backend holds the slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Single guava.duckdb database
    #[default]
    Duckdb,
    /// One JSON file per slot under store/
    File,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Duckdb => "duckdb",
            StorageBackend::File => "file",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duckdb" | "db" => Ok(StorageBackend::Duckdb),
            "file" | "files" | "json" => Ok(StorageBackend::File),
            other => Err(Error::Config(format!(
                "unknown storage backend '{}' (expected duckdb or file)",
                other
            ))),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage: Option<StorageBackend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sign_in_latency_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upload_latency_ms: Option<u64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Guava configuration (resolved view of settings plus env overrides)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub sign_in_latency: Duration,
    pub upload_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageBackend::default(),
            sign_in_latency: DEFAULT_SIGN_IN_LATENCY,
            upload_latency: DEFAULT_UPLOAD_LATENCY,
        }
    }
}

fn read_settings(guava_dir: &Path) -> Result<SettingsFile> {
    let settings_path = guava_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

fn env_millis(name: &str) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(value) => {
            let ms: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of milliseconds", name))?;
            Ok(Some(Duration::from_millis(ms)))
        }
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load config from the guava directory
    ///
    /// Settings can be overridden via environment variables
    /// GUAVA_STORAGE, GUAVA_SIGNIN_LATENCY_MS and GUAVA_UPLOAD_LATENCY_MS
    /// (for CI/testing).
    pub fn load(guava_dir: &Path) -> Result<Self> {
        let mut config = Self::load_saved(guava_dir)?;

        if let Ok(value) = std::env::var("GUAVA_STORAGE") {
            config.storage = value.parse()?;
        }
        if let Some(latency) = env_millis("GUAVA_SIGNIN_LATENCY_MS")? {
            config.sign_in_latency = latency;
        }
        if let Some(latency) = env_millis("GUAVA_UPLOAD_LATENCY_MS")? {
            config.upload_latency = latency;
        }

        Ok(config)
    }

    /// Load only what settings.json says, ignoring environment overrides
    ///
    /// Use this before `save` so overrides never get written back.
    pub fn load_saved(guava_dir: &Path) -> Result<Self> {
        let raw = read_settings(guava_dir)?;
        let millis = |ms: Option<u64>, default| ms.map(Duration::from_millis).unwrap_or(default);

        Ok(Self {
            storage: raw.app.storage.unwrap_or_default(),
            sign_in_latency: millis(raw.app.sign_in_latency_ms, DEFAULT_SIGN_IN_LATENCY),
            upload_latency: millis(raw.app.upload_latency_ms, DEFAULT_UPLOAD_LATENCY),
        })
    }

    /// Update one setting by its settings.json name
    ///
    /// Accepts `storage`, `signInLatencyMs` and `uploadLatencyMs` (or their
    /// kebab-case forms).
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), Error> {
        let millis = || {
            let ms: u64 = value.trim().parse().map_err(|_| {
                Error::Config(format!("{} must be a whole number of milliseconds", key))
            })?;
            Ok::<_, Error>(Duration::from_millis(ms))
        };

        match key {
            "storage" => self.storage = value.parse()?,
            "signInLatencyMs" | "sign-in-latency-ms" => self.sign_in_latency = millis()?,
            "uploadLatencyMs" | "upload-latency-ms" => self.upload_latency = millis()?,
            other => {
                return Err(Error::Config(format!(
                    "unknown setting '{}' (expected storage, signInLatencyMs or uploadLatencyMs)",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Save config to the guava directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, guava_dir: &Path) -> Result<()> {
        let settings_path = guava_dir.join("settings.json");
        let mut settings = read_settings(guava_dir)?;

        settings.app.storage = Some(self.storage);
        settings.app.sign_in_latency_ms = Some(self.sign_in_latency.as_millis() as u64);
        settings.app.upload_latency_ms = Some(self.upload_latency.as_millis() as u64);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {}", settings_path.display()))?;
        Ok(())
    }
}
