// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration module.
//!
//! Handles loading and saving user settings and the simulated transport
//! latencies.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "garbot";
const CONFIG_FILE: &str = "config.toml";

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory for the persisted session.
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// User settings.
    #[serde(default)]
    pub settings: Settings,

    /// Simulated transport latencies.
    #[serde(default)]
    pub mock: MockConfig,

    /// Control channel settings.
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,

    /// Follow the system colour scheme instead of `theme`.
    pub use_system_theme: bool,

    /// Re-pair with the remembered device on launch.
    pub auto_connect: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            use_system_theme: true,
            auto_connect: true,
        }
    }
}

/// Delays, in milliseconds, applied by the mock transports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub scan_ms: u64,
    pub pair_ms: u64,
    pub unpair_ms: u64,
    pub credentials_ms: u64,
    pub system_info_ms: u64,
    pub command_ms: u64,
    pub servo_ms: u64,
    pub scan_area_ms: u64,
    pub sensors_ms: u64,

    /// Multiplier on the pauses between quick-action steps.
    pub action_delay_factor: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            scan_ms: 2000,
            pair_ms: 1500,
            unpair_ms: 500,
            credentials_ms: 2000,
            system_info_ms: 1000,
            command_ms: 1000,
            servo_ms: 500,
            scan_area_ms: 1500,
            sensors_ms: 200,
            action_delay_factor: 1.0,
        }
    }
}

impl MockConfig {
    /// Zero latency everywhere, for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            scan_ms: 0,
            pair_ms: 0,
            unpair_ms: 0,
            credentials_ms: 0,
            system_info_ms: 0,
            command_ms: 0,
            servo_ms: 0,
            scan_area_ms: 0,
            sensors_ms: 0,
            action_delay_factor: 0.0,
        }
    }

    /// Scale a quick-action pause.
    pub fn action_delay(&self, base_ms: u64) -> Duration {
        let factor = self.action_delay_factor.max(0.0);
        Duration::from_millis((base_ms as f64 * factor).round() as u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address used for the control channel once the robot is on WiFi.
    pub default_device_address: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            default_device_address: "192.168.1.100".to_string(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            settings: Settings::default(),
            mock: MockConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&default_config_dir())?;

        config.data_dir = default_data_dir();
        std::fs::create_dir_all(&config.data_dir)?;

        Ok(config)
    }

    /// Load from `config_dir/config.toml`, writing defaults if it is missing.
    /// `data_dir` is set to `config_dir`; `load` overrides it.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(config_dir)?;

        let config_path = config_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            let config = Self::default();
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&config_path, content)?;
            config
        };

        config.data_dir = config_dir.to_path_buf();
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&default_config_dir())
    }

    pub fn save_to(&self, config_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(config_dir)?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_dir.join(CONFIG_FILE), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();

        assert!(dir.path().join("config.toml").exists());
        assert_eq!(config.settings.theme, Theme::System);
        assert!(config.settings.auto_connect);
        assert_eq!(config.mock.scan_ms, 2000);
        assert_eq!(config.network.default_device_address, "192.168.1.100");
    }

    #[test]
    fn test_settings_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let mut config = Config::load_from(dir.path()).unwrap();
        config.settings.theme = Theme::Dark;
        config.settings.auto_connect = false;
        config.save_to(dir.path()).unwrap();

        let reloaded = Config::load_from(dir.path()).unwrap();
        assert_eq!(reloaded.settings.theme, Theme::Dark);
        assert!(!reloaded.settings.auto_connect);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[settings]\ntheme = \"light\"\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.settings.theme, Theme::Light);
        assert!(config.settings.use_system_theme);
        assert_eq!(config.mock.pair_ms, 1500);
    }

    #[test]
    fn test_action_delay_scaling() {
        let mut mock = MockConfig::default();
        assert_eq!(mock.action_delay(500), Duration::from_millis(500));
        mock.action_delay_factor = 0.5;
        assert_eq!(mock.action_delay(1000), Duration::from_millis(500));
        assert_eq!(MockConfig::instant().action_delay(1000), Duration::ZERO);
    }
}
