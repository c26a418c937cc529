use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::dispatch::AlertConfig;
use super::fall::FallConfig;
use super::voice;

/// Application settings with detector and alert configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory holding the trace feeds (accel.log, speech.log, gps.log).
    pub trace_dir: PathBuf,
    /// Event-loop cadence in milliseconds.
    pub tick_ms: u64,
    #[serde(default)]
    pub fall: FallConfig,
    #[serde(default)]
    pub alert: AlertConfig,
    /// SOS keyword set matched against transcripts.
    #[serde(default = "voice::default_keywords")]
    pub keywords: Vec<String>,
    /// Emergency contact phone number.
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub sos_enabled: bool,
    #[serde(default = "default_true")]
    pub voice_automation: bool,
    /// Where sent alerts are appended, one JSON line each.
    #[serde(default = "default_outbox_path")]
    pub outbox_path: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_outbox_path() -> PathBuf {
    PathBuf::from("outbox.jsonl")
}

impl Default for Settings {
    fn default() -> Self {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());

        Self {
            trace_dir: PathBuf::from(home).join(".safeguard/traces"),
            tick_ms: 250,
            fall: FallConfig::default(),
            alert: AlertConfig::default(),
            keywords: voice::default_keywords(),
            contact: None,
            sos_enabled: false,
            voice_automation: true,
            outbox_path: default_outbox_path(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let default = manager.load();
        assert_eq!(default.tick_ms, 250);
        assert!(!default.sos_enabled);

        let new_settings = Settings {
            trace_dir: PathBuf::from("/tmp/traces"),
            tick_ms: 100,
            contact: Some("+911234567890".to_string()),
            sos_enabled: true,
            ..Settings::default()
        };

        manager.save(&new_settings).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded.trace_dir, PathBuf::from("/tmp/traces"));
        assert_eq!(loaded.tick_ms, 100);
        assert_eq!(loaded.contact.as_deref(), Some("+911234567890"));
        assert!(loaded.sos_enabled);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"trace_dir": "/tmp/traces", "tick_ms": 50}"#,
        )
        .unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.tick_ms, 50);
        assert_eq!(loaded.fall.threshold, 5.0);
        assert_eq!(loaded.alert.debounce_ms, 2000);
        assert_eq!(loaded.keywords, vec!["help", "sos"]);
        assert!(loaded.voice_automation);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        let loaded = manager.load();
        assert_eq!(loaded.tick_ms, 250);
    }
}
