//! Publisher configuration.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/extpub/publisher.toml`
//! - Windows: `%APPDATA%/extpub/publisher.toml`
//!
//! `EXTPUB_CONFIG` points at a different file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use extpub_account_api::{ChangelogEntry, DEFAULT_BASE_URL};
use extpub_publish::{PollConfig, Release};
use serde::{Deserialize, Serialize};

const CONFIG_ENV: &str = "EXTPUB_CONFIG";

/// Publisher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Store API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Session token sent with every request.
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub producer_id: i32,

    #[serde(default)]
    pub poll: PollSettings,

    /// The release to publish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<Release>,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.into()
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: String::new(),
            producer_id: 0,
            poll: PollSettings::default(),
            release: None,
        }
    }
}

/// `[poll]` section, in whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub interval_secs: u64,
    pub max_attempts: u32,
    pub backoff_factor: f64,
    pub max_interval_secs: u64,
    pub jitter: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        let poll = PollConfig::default();
        Self {
            interval_secs: poll.interval.as_secs(),
            max_attempts: poll.max_attempts,
            backoff_factor: poll.backoff_factor,
            max_interval_secs: poll.max_interval.as_secs(),
            jitter: poll.jitter,
        }
    }
}

impl From<&PollSettings> for PollConfig {
    fn from(s: &PollSettings) -> Self {
        PollConfig {
            interval: Duration::from_secs(s.interval_secs),
            max_attempts: s.max_attempts,
            backoff_factor: s.backoff_factor,
            max_interval: Duration::from_secs(s.max_interval_secs),
            jitter: s.jitter,
        }
    }
}

impl PublisherConfig {
    /// Defaults plus a placeholder `[release]` section to fill in.
    pub fn template() -> Self {
        Self {
            release: Some(Release {
                extension_id: 0,
                version: "1.0.0".into(),
                constraint: ">=6.5.0.0, <6.7.0.0".into(),
                artifact: PathBuf::from("build/Extension.zip"),
                icon: Some(PathBuf::from("src/Resources/config/plugin.png")),
                changelogs: vec![ChangelogEntry {
                    locale: "en_GB".into(),
                    text: "Initial release".into(),
                }],
                ion_cube_encrypted: false,
                license_check_required: false,
            }),
            ..Self::default()
        }
    }

    /// Loads configuration from disk.
    ///
    /// A missing file is created from [`template`](Self::template) so it can
    /// be filled in, and the load fails.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_or_init(&config_path()?)
    }

    pub fn load_or_init(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Self::template().save_to(path)?;
            anyhow::bail!(
                "no configuration found, wrote a template to {}",
                path.display()
            )
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: PublisherConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // Holds the API token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Returns the release section, or an error naming what is missing.
    pub fn release(&self) -> anyhow::Result<&Release> {
        if self.token.is_empty() {
            anyhow::bail!("configuration has no API token");
        }
        self.release
            .as_ref()
            .context("configuration has no [release] section")
    }
}

/// Returns the configuration file path, honouring `EXTPUB_CONFIG`.
fn config_path() -> anyhow::Result<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => default_config_path(),
    }
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("extpub")
            .join("publisher.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("extpub").join("publisher.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/extpub/publisher.toml"))
    }
}
