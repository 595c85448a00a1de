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

//! Scanning, pairing and WiFi provisioning.

use tracing::{info, warn};

use super::{AppContext, ScreenResult};
use crate::error::ServiceError;
use crate::state::ConnectionType;
use crate::ui::Alert;

/// Ask for radio permissions.
pub async fn request_permissions(ctx: &AppContext) -> ScreenResult {
    match ctx.pairing.request_permissions().await {
        Ok(()) => Ok(None),
        Err(e) => Err(Alert::error(
            "Bluetooth access required",
            format!(
                "Garbot needs Bluetooth access to connect to your device during initial setup ({})",
                e
            ),
        )),
    }
}

/// Scan and store the found robots. Ignored while a scan is running.
pub async fn scan(ctx: &AppContext) -> ScreenResult {
    if ctx.pairing.is_scanning() {
        return Ok(None);
    }

    match ctx.pairing.scan().await {
        Ok(devices) => {
            let empty = devices.is_empty();
            ctx.state.set_available_devices(devices);
            if empty {
                Ok(Some(Alert::info(
                    "No devices found",
                    "Make sure your Garbot is switched on and nearby.",
                )))
            } else {
                Ok(None)
            }
        }
        Err(ServiceError::ScanInProgress) => Ok(None),
        Err(e) => {
            ctx.logs.error(format!("Scan error: {}", e));
            Err(Alert::error(
                "Error",
                "Bluetooth scan failed. Check the permissions.",
            ))
        }
    }
}

/// Pair with a robot from the last scan.
pub async fn connect(ctx: &AppContext, device_id: &str) -> ScreenResult {
    let Some(device) = ctx.state.find_available_device(device_id) else {
        return Err(Alert::error(
            "Unknown device",
            format!("No scanned device with id {}", device_id),
        ));
    };

    if let Err(e) = ctx.state.begin_connecting() {
        return Err(Alert::error("Connection failed", e.to_string()));
    }

    let outcome = match ctx.pairing.connect(&device.id).await {
        Ok(true) => ctx
            .state
            .set_connected(device.clone())
            .map_err(|e| e.to_string()),
        Ok(false) => Err("Failed to connect".to_string()),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(()) => {
            ctx.logs.info(format!("Connected to {}", device.name));
            ctx.persist();
            Ok(Some(Alert::info(
                "Connection successful",
                format!("{} is now connected and ready.", device.name),
            )))
        }
        Err(reason) => {
            ctx.logs.error(format!("Connection error: {}", reason));
            if let Err(e) = ctx.state.pairing_failed() {
                warn!("Could not revert failed pairing: {}", e);
            }
            Err(Alert::error(
                "Connection failed",
                "Could not connect to the device. Please try again.",
            ))
        }
    }
}

/// Drop the current robot. Does nothing when no robot is set.
pub async fn disconnect(ctx: &AppContext) -> ScreenResult {
    let Some(device) = ctx.state.get_current_device() else {
        return Ok(None);
    };

    match ctx.pairing.disconnect(&device.id).await {
        Ok(_) => {
            ctx.state.set_disconnected();
            ctx.control.clear_base_url();
            ctx.logs.info("Disconnected from device");
            ctx.persist();
            Ok(Some(Alert::info("Disconnected", "Device was disconnected.")))
        }
        Err(e) => {
            ctx.logs.error(format!("Disconnect error: {}", e));
            Err(Alert::from_service("Disconnect failed", &e))
        }
    }
}

/// Provision the paired robot onto WiFi and switch the session to it.
pub async fn setup_wifi(ctx: &AppContext, ssid: &str, password: &str) -> ScreenResult {
    if ssid.trim().is_empty() {
        return Err(Alert::error("Error", "Please enter a WiFi name."));
    }

    let device = ctx.require_device().map_err(|_| {
        Alert::error(
            "Error",
            "No Garbot connected. Connect a device over Bluetooth first.",
        )
    })?;

    if ctx.state.get_connection_type() != Some(ConnectionType::Bluetooth) {
        return Err(Alert::error(
            "Error",
            format!("{} is already connected over WiFi.", device.name),
        ));
    }

    let outcome = match ctx
        .provisioning
        .setup_network(&device.id, ssid, password)
        .await
    {
        Ok(true) => ctx
            .state
            .set_network_provisioned()
            .map_err(|e| e.to_string()),
        Ok(false) => Err("WiFi setup failed".to_string()),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(()) => {
            ctx.control.set_base_url(&ctx.device_address);
            ctx.logs.info("WiFi setup completed successfully");
            ctx.persist();

            // The dashboard shows network details as soon as the robot is on WiFi.
            if let Err(alert) = super::dashboard::fetch_system_info(ctx).await {
                warn!("{}", alert);
            }
            Ok(Some(Alert::info(
                "WiFi setup successful",
                format!(
                    "{} is now connected to \"{}\" and can be controlled over WiFi.",
                    device.name,
                    ssid.trim()
                ),
            )))
        }
        Err(reason) => {
            ctx.logs.error(format!("WiFi setup failed: {}", reason));
            Err(Alert::error(
                "WiFi setup failed",
                "Check the WiFi details and try again.",
            ))
        }
    }
}

/// Reload the persisted session and, if asked to, pair with the
/// remembered robot again.
pub async fn restore_session(ctx: &AppContext, auto_connect: bool) -> ScreenResult {
    let Some(device) = ctx.restore() else {
        return Ok(None);
    };
    info!("Remembered device: {} ({})", device.name, device.id);

    if !auto_connect {
        return Ok(None);
    }

    ctx.logs
        .info(format!("Auto-connecting to {}", device.name));
    let mut devices = ctx.state.get_available_devices();
    if !devices.iter().any(|d| d.id == device.id) {
        devices.push(device.clone());
        ctx.state.set_available_devices(devices);
    }
    connect(ctx, &device.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::MockBluetooth;
    use crate::config::{Config, MockConfig};
    use crate::control::MockControl;
    use crate::state::ConnectionStatus;
    use std::sync::Arc;

    fn context() -> AppContext {
        let mut config = Config::default();
        config.mock = MockConfig::instant();
        AppContext::new(
            Arc::new(MockBluetooth::instant()),
            Arc::new(MockControl::instant()),
            &config,
            None,
        )
    }

    #[tokio::test]
    async fn test_scan_connect_provision() {
        let ctx = context();
        scan(&ctx).await.unwrap();
        assert_eq!(ctx.state.get_available_devices().len(), 3);

        let alert = connect(&ctx, "1").await.unwrap().unwrap();
        assert!(!alert.is_error());
        assert_eq!(ctx.state.get_status(), ConnectionStatus::Connected);

        setup_wifi(&ctx, "Garden", "hunter2").await.unwrap();
        assert_eq!(ctx.state.get_connection_type(), Some(ConnectionType::Wifi));
        assert_eq!(ctx.control.base_url().as_deref(), Some("http://192.168.1.100"));
        assert_eq!(ctx.state.get_system_info().unwrap().ssid, "HomeWiFi");
        assert_eq!(ctx.logs.last().unwrap().message, "System information updated");
    }

    #[tokio::test]
    async fn test_connect_unknown_device() {
        let ctx = context();
        let alert = connect(&ctx, "9").await.unwrap_err();
        assert!(alert.is_error());
        assert_eq!(ctx.state.get_status(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_disconnect_without_device_is_noop() {
        let ctx = context();
        assert_eq!(disconnect(&ctx).await.unwrap(), None);
        assert!(ctx.logs.is_empty());
        assert_eq!(ctx.state.get_status(), ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_wifi_requires_device_and_ssid() {
        let ctx = context();
        assert!(setup_wifi(&ctx, "", "x").await.is_err());
        assert!(setup_wifi(&ctx, "Garden", "x").await.is_err());
        assert_eq!(ctx.state.get_connection_type(), None);
        assert!(ctx.logs.is_empty());
    }
}
