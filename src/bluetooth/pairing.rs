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

//! Discovery and pairing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

use super::transport::PairingTransport;
use crate::error::{ServiceError, ServiceResult};
use crate::logs::LogStore;
use crate::protocol::{Command, Device};

/// Wraps a [`PairingTransport`] with logging and a scan busy flag.
pub struct PairingService {
    transport: Arc<dyn PairingTransport>,
    logs: Arc<LogStore>,
    /// Id of the scan holding the busy flag, 0 when idle.
    active_scan: AtomicU64,
    next_scan: AtomicU64,
}

/// Releases the busy flag when the scan future completes or is dropped,
/// unless a newer scan has taken it over since.
struct ScanGuard<'a> {
    active: &'a AtomicU64,
    id: u64,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let _ = self
            .active
            .compare_exchange(self.id, 0, Ordering::SeqCst, Ordering::SeqCst);
    }
}

impl PairingService {
    pub fn new(transport: Arc<dyn PairingTransport>, logs: Arc<LogStore>) -> Self {
        Self {
            transport,
            logs,
            active_scan: AtomicU64::new(0),
            next_scan: AtomicU64::new(1),
        }
    }

    /// Request radio permissions from the platform.
    pub async fn request_permissions(&self) -> ServiceResult<()> {
        match self.transport.request_permissions().await {
            Ok(true) => {
                self.logs.info("Bluetooth permissions granted");
                Ok(())
            }
            Ok(false) => {
                self.logs.error("Bluetooth permissions denied");
                Err(ServiceError::PermissionDenied)
            }
            Err(e) => {
                self.logs
                    .error(format!("Error requesting permissions: {}", e));
                Err(ServiceError::PermissionDenied)
            }
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.active_scan.load(Ordering::SeqCst) != 0
    }

    /// Scan for robots. Only one scan may run at a time.
    pub async fn scan(&self) -> ServiceResult<Vec<Device>> {
        let id = self.next_scan.fetch_add(1, Ordering::SeqCst);
        if self
            .active_scan
            .compare_exchange(0, id, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Scan requested while another scan is running");
            return Err(ServiceError::ScanInProgress);
        }
        let _guard = ScanGuard {
            active: &self.active_scan,
            id,
        };

        self.logs.info("Started scanning for Bluetooth devices");

        let devices = self
            .transport
            .discover()
            .await
            .map_err(|e| ServiceError::ScanFailed(e.to_string()))?;

        self.logs
            .info(format!("Found {} Garbot devices", devices.len()));
        Ok(devices)
    }

    /// Mark the running scan as stopped. Its late completion no longer
    /// holds or releases the busy flag.
    pub fn stop_scan(&self) {
        if self.active_scan.swap(0, Ordering::SeqCst) != 0 {
            self.logs.info("Stopped scanning for Bluetooth devices");
        }
    }

    pub async fn connect(&self, device_id: &str) -> ServiceResult<bool> {
        self.logs
            .info(format!("Connecting to device {}...", device_id));

        let paired = self
            .transport
            .pair(device_id)
            .await
            .map_err(|e| ServiceError::Connection(e.to_string()))?;

        if paired {
            self.logs.info(format!("Connected to device {}", device_id));
        }
        Ok(paired)
    }

    pub async fn disconnect(&self, device_id: &str) -> ServiceResult<bool> {
        self.logs
            .info(format!("Disconnecting from device {}...", device_id));

        let unpaired = self
            .transport
            .unpair(device_id)
            .await
            .map_err(|e| ServiceError::Connection(e.to_string()))?;

        if unpaired {
            self.logs
                .info(format!("Disconnected from device {}", device_id));
        }
        Ok(unpaired)
    }

    /// Send a command to a paired robot over the short-range link.
    pub async fn send_command(&self, device_id: &str, command: &Command) -> ServiceResult<bool> {
        let task = command.task.as_str();
        self.logs
            .info(format!("Sending command over Bluetooth: {}", task));

        let ok = self
            .transport
            .send(device_id, command)
            .await
            .map_err(|e| ServiceError::CommandFailed(e.to_string()))?;

        if ok {
            self.logs
                .info(format!("Command {} executed successfully", task));
        }
        Ok(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::MockBluetooth;
    use crate::config::MockConfig;
    use std::time::Duration;

    fn service(transport: MockBluetooth) -> (PairingService, Arc<LogStore>) {
        let logs = LogStore::new();
        (PairingService::new(Arc::new(transport), logs.clone()), logs)
    }

    #[tokio::test]
    async fn test_scan_logs_and_returns_devices() {
        let (pairing, logs) = service(MockBluetooth::instant());
        let devices = pairing.scan().await.unwrap();

        assert_eq!(devices.len(), 3);
        assert!(!pairing.is_scanning());
        let messages: Vec<String> = logs.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            vec![
                "Started scanning for Bluetooth devices".to_string(),
                "Found 3 Garbot devices".to_string(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_scan_rejected_while_busy() {
        let mut config = MockConfig::instant();
        config.scan_ms = 2000;
        let (pairing, _logs) = service(MockBluetooth::new(&config));
        let pairing = Arc::new(pairing);

        let first = {
            let pairing = pairing.clone();
            tokio::spawn(async move { pairing.scan().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(pairing.is_scanning());

        let second = pairing.scan().await;
        assert!(matches!(second, Err(ServiceError::ScanInProgress)));

        let devices = first.await.unwrap().unwrap();
        assert_eq!(devices.len(), 3);
        assert!(!pairing.is_scanning());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_scan_does_not_release_newer_scan() {
        let mut config = MockConfig::instant();
        config.scan_ms = 2000;
        let (pairing, logs) = service(MockBluetooth::new(&config));
        let pairing = Arc::new(pairing);

        let first = {
            let pairing = pairing.clone();
            tokio::spawn(async move { pairing.scan().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        pairing.stop_scan();
        assert!(!pairing.is_scanning());
        assert_eq!(logs.last().unwrap().message, "Stopped scanning for Bluetooth devices");

        tokio::time::sleep(Duration::from_millis(990)).await;
        let second = {
            let pairing = pairing.clone();
            tokio::spawn(async move { pairing.scan().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(pairing.is_scanning());

        // First scan completes while the second is still running.
        assert_eq!(first.await.unwrap().unwrap().len(), 3);
        assert!(pairing.is_scanning());
        assert!(matches!(
            pairing.scan().await,
            Err(ServiceError::ScanInProgress)
        ));

        assert_eq!(second.await.unwrap().unwrap().len(), 3);
        assert!(!pairing.is_scanning());
    }

    #[tokio::test]
    async fn test_stop_scan_only_logs_when_active() {
        let (pairing, logs) = service(MockBluetooth::instant());
        pairing.stop_scan();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let (pairing, logs) = service(MockBluetooth::instant());
        assert!(pairing.connect("2").await.unwrap());
        assert!(pairing.disconnect("2").await.unwrap());
        assert_eq!(logs.len(), 4);
        assert_eq!(logs.last().unwrap().message, "Disconnected from device 2");
    }
}
