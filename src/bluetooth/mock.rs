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

//! Simulated radio with fixed latencies and canned results.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::transport::PairingTransport;
use crate::config::MockConfig;
use crate::protocol::{Command, Device};

/// Robots returned by every simulated scan.
pub const MOCK_DEVICES: [(&str, &str); 3] = [
    ("1", "Garbot_1234"),
    ("2", "Garbot_5678"),
    ("3", "Garbot_9ABC"),
];

/// Radio stand-in that always succeeds after a delay.
#[derive(Debug, Clone)]
pub struct MockBluetooth {
    scan_delay: Duration,
    pair_delay: Duration,
    unpair_delay: Duration,
    credentials_delay: Duration,
    send_delay: Duration,
}

impl MockBluetooth {
    pub fn new(config: &MockConfig) -> Self {
        Self {
            scan_delay: Duration::from_millis(config.scan_ms),
            pair_delay: Duration::from_millis(config.pair_ms),
            unpair_delay: Duration::from_millis(config.unpair_ms),
            credentials_delay: Duration::from_millis(config.credentials_ms),
            send_delay: Duration::from_millis(config.command_ms),
        }
    }

    /// Mock without any latency.
    pub fn instant() -> Self {
        Self::new(&MockConfig::instant())
    }
}

async fn simulate(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl PairingTransport for MockBluetooth {
    async fn request_permissions(&self) -> Result<bool> {
        Ok(true)
    }

    async fn discover(&self) -> Result<Vec<Device>> {
        simulate(self.scan_delay).await;
        Ok(MOCK_DEVICES
            .iter()
            .map(|(id, name)| Device::new(*id, *name))
            .collect())
    }

    async fn pair(&self, device_id: &str) -> Result<bool> {
        simulate(self.pair_delay).await;
        debug!("Mock paired with {}", device_id);
        Ok(true)
    }

    async fn unpair(&self, device_id: &str) -> Result<bool> {
        simulate(self.unpair_delay).await;
        debug!("Mock unpaired from {}", device_id);
        Ok(true)
    }

    async fn send_credentials(
        &self,
        device_id: &str,
        ssid: &str,
        _password: &str,
    ) -> Result<bool> {
        simulate(self.credentials_delay).await;
        debug!("Mock delivered credentials for '{}' to {}", ssid, device_id);
        Ok(true)
    }

    async fn send(&self, device_id: &str, command: &Command) -> Result<bool> {
        simulate(self.send_delay).await;
        debug!("Mock sent {} to {}", command.to_json()?, device_id);
        Ok(true)
    }
}
