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

//! Local-network control channel.
//!
//! Every request needs a base address, set once the robot has joined the
//! network. Without one the service fails with
//! [`ServiceError::BaseUrlNotSet`].

mod mock;
mod transport;

pub use mock::{mock_system_info, MockControl};
pub use transport::ControlTransport;

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::logs::LogStore;
use crate::protocol::{Command, ScanPoint, SensorData, ServoConfig, SystemInfo};

/// Sends operational commands to a provisioned robot.
pub struct ControlService {
    transport: Arc<dyn ControlTransport>,
    logs: Arc<LogStore>,
    base_url: RwLock<Option<String>>,
}

impl ControlService {
    pub fn new(transport: Arc<dyn ControlTransport>, logs: Arc<LogStore>) -> Self {
        Self {
            transport,
            logs,
            base_url: RwLock::new(None),
        }
    }

    /// Point the service at `http://<address>`.
    pub fn set_base_url(&self, address: &str) {
        let url = format!("http://{}", address.trim());
        self.logs.info(format!("API base URL set to {}", url));
        *self.base_url.write() = Some(url);
    }

    pub fn clear_base_url(&self) {
        *self.base_url.write() = None;
    }

    pub fn base_url(&self) -> Option<String> {
        self.base_url.read().clone()
    }

    fn require_base(&self) -> ServiceResult<String> {
        self.base_url().ok_or(ServiceError::BaseUrlNotSet)
    }

    pub async fn get_system_info(&self) -> ServiceResult<SystemInfo> {
        let base = self.require_base()?;
        self.logs.info("Fetching system info...");

        let info = self
            .transport
            .get_system_info(&base)
            .await
            .map_err(|e| ServiceError::CommandFailed(e.to_string()))?;

        self.logs.info("System info fetched successfully");
        Ok(info)
    }

    pub async fn send_command(&self, command: &Command) -> ServiceResult<bool> {
        let base = self.require_base()?;
        let task = command.task.as_str();
        self.logs.info(format!("Sending command: {}", task));

        let ok = self
            .transport
            .send_command(&base, command)
            .await
            .map_err(|e| ServiceError::CommandFailed(e.to_string()))?;

        if ok {
            self.logs
                .info(format!("Command {} executed successfully", task));
        }
        Ok(ok)
    }

    pub async fn test_servo(&self, config: ServoConfig) -> ServiceResult<bool> {
        let base = self.require_base()?;
        self.logs.info(format!(
            "Testing servo on channel {} with angle {}°",
            config.channel, config.angle
        ));

        let ok = self
            .transport
            .test_servo(&base, config)
            .await
            .map_err(|e| ServiceError::CommandFailed(e.to_string()))?;

        if ok {
            self.logs
                .info(format!("Servo test completed for channel {}", config.channel));
        }
        Ok(ok)
    }

    pub async fn send_scan_area(&self, points: &[ScanPoint]) -> ServiceResult<bool> {
        let base = self.require_base()?;
        self.logs
            .info(format!("Sending scan area with {} points", points.len()));

        let ok = self
            .transport
            .send_scan_area(&base, points)
            .await
            .map_err(|e| ServiceError::CommandFailed(e.to_string()))?;

        if ok {
            self.logs.info("Scan area sent successfully");
        }
        Ok(ok)
    }

    pub async fn read_sensors(&self) -> ServiceResult<SensorData> {
        let base = self.require_base()?;
        let data = self
            .transport
            .read_sensors(&base)
            .await
            .map_err(|e| ServiceError::CommandFailed(e.to_string()))?;

        self.logs.debug(format!(
            "Sensors: distance {:.1} cm, tilt {:.2} V",
            data.distance, data.tilt_x
        ));
        Ok(data)
    }
}
