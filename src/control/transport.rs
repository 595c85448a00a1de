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

//! Transport seam for the local-network control channel.

use anyhow::Result;
use async_trait::async_trait;

use crate::protocol::{Command, ScanPoint, SensorData, ServoConfig, SystemInfo};

/// Requests the robot's HTTP-style API must answer. `base` is the
/// `http://<address>` prefix set on the control service.
#[async_trait]
pub trait ControlTransport: Send + Sync {
    async fn get_system_info(&self, base: &str) -> Result<SystemInfo>;

    async fn send_command(&self, base: &str, command: &Command) -> Result<bool>;

    async fn test_servo(&self, base: &str, config: ServoConfig) -> Result<bool>;

    async fn send_scan_area(&self, base: &str, points: &[ScanPoint]) -> Result<bool>;

    async fn read_sensors(&self, base: &str) -> Result<SensorData>;
}
