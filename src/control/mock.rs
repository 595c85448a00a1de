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

//! Simulated control channel.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use std::time::Duration;
use tracing::debug;

use super::transport::ControlTransport;
use crate::config::MockConfig;
use crate::protocol::{Command, MqttStatus, ScanPoint, SensorData, ServoConfig, SystemInfo};

/// System info reported by the simulated robot.
pub fn mock_system_info() -> SystemInfo {
    SystemInfo {
        ssid: "HomeWiFi".to_string(),
        ip_address: "192.168.1.100".to_string(),
        mqtt_status: MqttStatus::Connected,
        firmware_version: "1.2.3".to_string(),
    }
}

/// Control channel stand-in that always succeeds after a delay.
#[derive(Debug, Clone)]
pub struct MockControl {
    system_info_delay: Duration,
    command_delay: Duration,
    servo_delay: Duration,
    scan_area_delay: Duration,
    sensors_delay: Duration,
}

impl MockControl {
    pub fn new(config: &MockConfig) -> Self {
        Self {
            system_info_delay: Duration::from_millis(config.system_info_ms),
            command_delay: Duration::from_millis(config.command_ms),
            servo_delay: Duration::from_millis(config.servo_ms),
            scan_area_delay: Duration::from_millis(config.scan_area_ms),
            sensors_delay: Duration::from_millis(config.sensors_ms),
        }
    }

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
impl ControlTransport for MockControl {
    async fn get_system_info(&self, base: &str) -> Result<SystemInfo> {
        simulate(self.system_info_delay).await;
        debug!("GET {}/api/system", base);
        Ok(mock_system_info())
    }

    async fn send_command(&self, base: &str, command: &Command) -> Result<bool> {
        simulate(self.command_delay).await;
        debug!("POST {}/api/command {}", base, command.to_json()?);
        Ok(true)
    }

    async fn test_servo(&self, base: &str, config: ServoConfig) -> Result<bool> {
        simulate(self.servo_delay).await;
        debug!(
            "POST {}/api/servo channel={} angle={}",
            base, config.channel, config.angle
        );
        Ok(true)
    }

    async fn send_scan_area(&self, base: &str, points: &[ScanPoint]) -> Result<bool> {
        simulate(self.scan_area_delay).await;
        debug!(
            "POST {}/api/scan-area {}",
            base,
            serde_json::to_string(points)?
        );
        Ok(true)
    }

    async fn read_sensors(&self, base: &str) -> Result<SensorData> {
        simulate(self.sensors_delay).await;
        debug!("GET {}/api/sensors", base);
        Ok(SensorData {
            distance: 42.5,
            tilt_x: 0.12,
            obstacle: false,
            timestamp: Local::now(),
        })
    }
}
