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

//! Transport seam for the short-range link.

use anyhow::Result;
use async_trait::async_trait;

use crate::protocol::{Command, Device};

/// Operations the short-range radio must provide.
#[async_trait]
pub trait PairingTransport: Send + Sync {
    /// Ask the platform for radio permissions.
    async fn request_permissions(&self) -> Result<bool>;

    /// Discover nearby robots.
    async fn discover(&self) -> Result<Vec<Device>>;

    async fn pair(&self, device_id: &str) -> Result<bool>;

    async fn unpair(&self, device_id: &str) -> Result<bool>;

    /// Hand WiFi credentials to a paired robot.
    async fn send_credentials(&self, device_id: &str, ssid: &str, password: &str)
        -> Result<bool>;

    /// Deliver a command over the paired link.
    async fn send(&self, device_id: &str, command: &Command) -> Result<bool>;
}
