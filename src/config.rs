use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

fn default_api_base_url() -> String {
    "http://127.0.0.1:3000/api".to_string()
}

fn default_history_cap() -> usize {
    50
}

fn default_suggestion_delay_ms() -> u64 {
    200
}

fn default_min_suggestion_chars() -> usize {
    2
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_speech_rate() -> f32 {
    0.9
}

fn default_true() -> bool {
    true
}

/// Runtime settings, built once in `main` and handed to each service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default)]
    pub data_dir: PathBuf,

    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    #[serde(default = "default_suggestion_delay_ms")]
    pub suggestion_delay_ms: u64,

    #[serde(default = "default_min_suggestion_chars")]
    pub min_suggestion_chars: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,

    /// Whether the shell has an on-device synthesizer to fall back to.
    #[serde(default = "default_true")]
    pub on_device_speech: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_dir: default_data_dir(),
            history_cap: default_history_cap(),
            suggestion_delay_ms: default_suggestion_delay_ms(),
            min_suggestion_chars: default_min_suggestion_chars(),
            request_timeout_secs: default_request_timeout_secs(),
            speech_rate: default_speech_rate(),
            on_device_speech: true,
        }
    }
}

impl CoreConfig {
    pub fn suggestion_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Config file from the platform config dir, then `WORDY_*` env overrides.
    pub fn load() -> Self {
        let mut cfg = match config_file_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Self::default(),
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        cfg
    }

    pub fn from_file(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                return Self::default();
            }
        };

        Self::from_toml(&data).unwrap_or_else(|e| {
            tracing::warn!("invalid {}: {e}; using defaults", path.display());
            Self::default()
        })
    }

    pub fn from_toml(data: &str) -> Result<Self, toml::de::Error> {
        let mut cfg: CoreConfig = toml::from_str(data)?;
        if cfg.data_dir.as_os_str().is_empty() {
            cfg.data_dir = default_data_dir();
        }
        Ok(cfg)
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("WORDY_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(dir) = lookup("WORDY_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("WORDY_HISTORY_CAP") {
            match raw.trim().parse::<usize>() {
                Ok(cap) if cap > 0 => self.history_cap = cap,
                _ => tracing::warn!("ignoring WORDY_HISTORY_CAP={raw}"),
            }
        }

        if let Some(raw) = lookup("WORDY_SUGGESTION_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.suggestion_delay_ms = ms,
                Err(_) => tracing::warn!("ignoring WORDY_SUGGESTION_DELAY_MS={raw}"),
            }
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("app", "Wordy", "wordy-core")
}

fn config_file_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join(CONFIG_FILE))
}

fn default_data_dir() -> PathBuf {
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("wordy-data")
}
