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

//! Network provisioning over the short-range link.

use std::sync::Arc;

use super::transport::PairingTransport;
use crate::error::{ServiceError, ServiceResult};
use crate::logs::LogStore;

/// Sends WiFi credentials to a paired robot.
pub struct ProvisioningService {
    transport: Arc<dyn PairingTransport>,
    logs: Arc<LogStore>,
}

impl ProvisioningService {
    pub fn new(transport: Arc<dyn PairingTransport>, logs: Arc<LogStore>) -> Self {
        Self { transport, logs }
    }

    /// Deliver `ssid`/`password` to the device. The password may be empty.
    pub async fn setup_network(
        &self,
        device_id: &str,
        ssid: &str,
        password: &str,
    ) -> ServiceResult<bool> {
        let ssid = ssid.trim();
        if ssid.is_empty() {
            return Err(ServiceError::EmptySsid);
        }

        self.logs.info(format!(
            "Sending WiFi credentials to device {}...",
            device_id
        ));

        let sent = self
            .transport
            .send_credentials(device_id, ssid, password)
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if sent {
            self.logs
                .info(format!("WiFi credentials sent to device {}", device_id));
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::MockBluetooth;

    #[tokio::test]
    async fn test_empty_ssid_rejected_without_transport_call() {
        let logs = LogStore::new();
        let service = ProvisioningService::new(Arc::new(MockBluetooth::instant()), logs.clone());

        let result = service.setup_network("1", "   ", "secret").await;
        assert!(matches!(result, Err(ServiceError::EmptySsid)));
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_open_network_allowed() {
        let logs = LogStore::new();
        let service = ProvisioningService::new(Arc::new(MockBluetooth::instant()), logs.clone());

        assert!(service.setup_network("1", "Garden", "").await.unwrap());
        assert_eq!(logs.len(), 2);
    }
}
