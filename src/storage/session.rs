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

//! Persisted device and system info.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::state::{AppState, SessionSnapshot};

/// JSON blob holding the last connected device and its system info.
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    /// Open storage under the data directory.
    pub fn new(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join("session.json"),
        })
    }

    /// Read the stored snapshot. A missing or unreadable file yields an
    /// empty snapshot so a corrupt blob never blocks startup.
    pub fn load(&self) -> SessionSnapshot {
        if !self.path.exists() {
            return SessionSnapshot::default();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<SessionSnapshot>(&content)?));

        match parsed {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                SessionSnapshot::default()
            }
        }
    }

    /// Write a snapshot to disk.
    pub fn store(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, content)?;
        debug!("Session saved to {:?}", self.path);
        Ok(())
    }

    /// Persist the current store contents.
    pub fn save_state(&self, state: &AppState) -> Result<()> {
        self.store(&state.snapshot())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Device, MqttStatus, SystemInfo};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path()).unwrap();
        assert_eq!(storage.load(), SessionSnapshot::default());
    }

    #[test]
    fn test_store_and_load() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path()).unwrap();

        let snapshot = SessionSnapshot {
            current_device: Some(Device::new("2", "Garbot_5678")),
            system_info: Some(SystemInfo {
                ssid: "HomeWiFi".to_string(),
                ip_address: "192.168.1.100".to_string(),
                mqtt_status: MqttStatus::Disconnected,
                firmware_version: "1.2.3".to_string(),
            }),
        };
        storage.store(&snapshot).unwrap();

        let reopened = SessionStorage::new(dir.path()).unwrap();
        assert_eq!(reopened.load(), snapshot);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempdir().unwrap();
        let storage = SessionStorage::new(dir.path()).unwrap();
        std::fs::write(storage.path(), "{not json").unwrap();
        assert_eq!(storage.load(), SessionSnapshot::default());
    }
}
