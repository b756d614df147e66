//! Configuration loaded from `mediagen.toml`.
//!
//! [`MediaConfig`] holds every tunable. Values missing from the file fall back
//! to defaults, and credentials from the environment take precedence over the
//! file. The resolved value is passed to components explicitly; nothing reads
//! the environment after startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::poller::PollPolicy;

pub const DEFAULT_CONFIG_FILE: &str = "mediagen.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Bearer key for the kie.ai generation API.
    pub api_key: String,

    pub api_base_url: String,

    /// Where generated artifacts are written.
    pub output_dir: PathBuf,

    pub subtitles_dir: PathBuf,

    /// Where `catalog_download_asset` places restored files.
    pub catalog_download_dir: PathBuf,

    /// Optional webhook forwarded to the music API.
    pub music_callback_url: Option<String>,

    pub poll: PollSettings,

    pub catalog: CatalogConfig,

    pub whisper: WhisperConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub jobs: PollLimits,
    pub video: PollLimits,
    pub music: PollLimits,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PollLimits {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl PollLimits {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(self.max_attempts, Duration::from_millis(self.interval_ms))
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            jobs: PollLimits {
                max_attempts: 60,
                interval_ms: 5_000,
            },
            video: PollLimits {
                max_attempts: 90,
                interval_ms: 10_000,
            },
            music: PollLimits {
                max_attempts: 60,
                interval_ms: 10_000,
            },
        }
    }
}

/// Airtable catalog settings. The catalog is enabled only when the token and
/// base id are both present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    pub api_url: String,
    pub content_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            table_name: "Assets".to_string(),
            api_url: crate::catalog::API_URL.to_string(),
            content_url: crate::catalog::CONTENT_URL.to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_id.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhisperConfig {
    /// Executable name or path of the whisper.cpp CLI.
    pub binary: String,
    pub models_dir: PathBuf,
    pub model_base_url: String,
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            binary: "whisper-cli".to_string(),
            models_dir: PathBuf::from("models"),
            model_base_url: "https://huggingface.co/ggerganov/whisper.cpp/resolve/main".to_string(),
            timeout_secs: 600,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: crate::kie::client::API_URL.to_string(),
            output_dir: PathBuf::from("generated_media"),
            subtitles_dir: PathBuf::from("subtitles"),
            catalog_download_dir: PathBuf::from("catalog_downloads"),
            music_callback_url: None,
            poll: PollSettings::default(),
            catalog: CatalogConfig::default(),
            whisper: WhisperConfig::default(),
        }
    }
}

impl MediaConfig {
    /// Load from `path` (or `mediagen.toml` in the working directory), then
    /// apply environment overrides. A missing file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<MediaConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Environment values take precedence over the file. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(key) = get("KIE_API_KEY") {
            self.api_key = key;
        }
        if let Some(url) = get("KIE_BASE_URL") {
            self.api_base_url = url;
        }
        if let Some(dir) = get("MEDIAGEN_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(key) = get("AIRTABLE_API_KEY") {
            self.catalog.api_key = key;
        }
        if let Some(base) = get("AIRTABLE_BASE_ID") {
            self.catalog.base_id = base;
        }
        if let Some(table) = get("AIRTABLE_TABLE_NAME") {
            self.catalog.table_name = table;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn default_config_values() {
        let config = MediaConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.api_base_url, "https://api.kie.ai");
        assert_eq!(config.output_dir, PathBuf::from("generated_media"));
        assert_eq!(config.poll.jobs.max_attempts, 60);
        assert_eq!(config.poll.video.interval_ms, 10_000);
        assert!(!config.catalog.is_configured());
        assert_eq!(config.whisper.binary, "whisper-cli");
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "kie-123"
            output_dir = "out"

            [poll.music]
            max_attempts = 5
            interval_ms = 10

            [catalog]
            api_key = "pat-1"
            base_id = "app1"
        "#;
        let config: MediaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "kie-123");
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.poll.music.max_attempts, 5);
        assert_eq!(config.poll.jobs.max_attempts, 60);
        assert!(config.catalog.is_configured());
        assert_eq!(config.catalog.table_name, "Assets");
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: MediaConfig = toml::from_str(r#"api_key = "from-file""#).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("KIE_API_KEY", "from-env"),
            ("AIRTABLE_API_KEY", "pat"),
            ("AIRTABLE_BASE_ID", "appX"),
            ("AIRTABLE_TABLE_NAME", ""),
        ]);
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.catalog.base_id, "appX");
        // Empty values do not clobber defaults.
        assert_eq!(config.catalog.table_name, "Assets");
        assert!(config.catalog.is_configured());
    }

    #[test]
    fn poll_limits_to_policy() {
        let policy = PollLimits {
            max_attempts: 3,
            interval_ms: 250,
        }
        .policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.interval, Duration::from_millis(250));
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MediaConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.poll.video.max_attempts, 90);
    }
}
