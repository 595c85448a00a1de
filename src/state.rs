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

//! Application state management.
//!
//! The connection session only moves through the setters below:
//!
//! ```text
//! Disconnected --begin_connecting--> Connecting --set_connected--> Connected(Bluetooth)
//! Connecting --pairing_failed--> Disconnected
//! Connected(Bluetooth) --set_network_provisioned--> Connected(Wifi)
//! any --set_disconnected--> Disconnected
//! ```

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::SessionError;
use crate::protocol::{
    Device, ScanArea, ScanPoint, SensorData, Servo, ServoPositions, SystemInfo,
};

/// Connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
        }
    }
}

/// Link used to talk to the connected robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// Short-range pairing link.
    Bluetooth,
    /// Local network control channel.
    Wifi,
}

impl ConnectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Bluetooth => "Bluetooth",
            ConnectionType::Wifi => "WiFi",
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    status: ConnectionStatus,
    connection_type: Option<ConnectionType>,
    current_device: Option<Device>,
}

impl Session {
    fn disconnected() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            connection_type: None,
            current_device: None,
        }
    }

    fn reject(&self, to: &'static str) -> SessionError {
        SessionError::invalid(
            self.status,
            self.connection_type.as_ref().map(ConnectionType::as_str),
            to,
        )
    }
}

/// The persisted part of the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current_device: Option<Device>,
    pub system_info: Option<SystemInfo>,
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    session: RwLock<Session>,

    /// Devices found by the last scan.
    available_devices: RwLock<Vec<Device>>,

    /// Last system info reported by the robot.
    system_info: RwLock<Option<SystemInfo>>,

    scan_area: RwLock<ScanArea>,

    servo_positions: RwLock<ServoPositions>,

    /// Latest telemetry sample.
    sensor_data: RwLock<Option<SensorData>>,

    /// Whether the emergency stop is engaged.
    emergency_active: RwLock<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: RwLock::new(Session::disconnected()),
            available_devices: RwLock::new(Vec::new()),
            system_info: RwLock::new(None),
            scan_area: RwLock::new(ScanArea::default()),
            servo_positions: RwLock::new(ServoPositions::default()),
            sensor_data: RwLock::new(None),
            emergency_active: RwLock::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Enter `Connecting` at the start of a pairing attempt.
    pub fn begin_connecting(&self) -> Result<(), SessionError> {
        let mut session = self.session.write();
        if session.status != ConnectionStatus::Disconnected {
            return Err(session.reject("Connecting"));
        }
        session.status = ConnectionStatus::Connecting;
        debug!("Session: Disconnected -> Connecting");
        Ok(())
    }

    /// Pairing succeeded; the device is now reachable over Bluetooth.
    pub fn set_connected(&self, device: Device) -> Result<(), SessionError> {
        let mut session = self.session.write();
        if session.status != ConnectionStatus::Connecting {
            return Err(session.reject("Connected"));
        }
        session.status = ConnectionStatus::Connected;
        session.connection_type = Some(ConnectionType::Bluetooth);
        session.current_device = Some(Device {
            connected: true,
            ..device
        });
        debug!("Session: Connecting -> Connected (Bluetooth)");
        Ok(())
    }

    /// Pairing failed; fall back to `Disconnected`.
    pub fn pairing_failed(&self) -> Result<(), SessionError> {
        let mut session = self.session.write();
        if session.status != ConnectionStatus::Connecting {
            return Err(session.reject("Disconnected"));
        }
        *session = Session::disconnected();
        debug!("Session: Connecting -> Disconnected");
        Ok(())
    }

    /// Network provisioning succeeded on a Bluetooth-paired device.
    pub fn set_network_provisioned(&self) -> Result<(), SessionError> {
        let mut session = self.session.write();
        if session.status != ConnectionStatus::Connected
            || session.connection_type != Some(ConnectionType::Bluetooth)
        {
            return Err(session.reject("Connected (WiFi)"));
        }
        session.connection_type = Some(ConnectionType::Wifi);
        debug!("Session: Connected (Bluetooth) -> Connected (WiFi)");
        Ok(())
    }

    /// Drop the session from any state.
    pub fn set_disconnected(&self) {
        *self.session.write() = Session::disconnected();
        debug!("Session: -> Disconnected");
    }

    pub fn get_status(&self) -> ConnectionStatus {
        self.session.read().status
    }

    pub fn get_connection_type(&self) -> Option<ConnectionType> {
        self.session.read().connection_type
    }

    pub fn get_current_device(&self) -> Option<Device> {
        self.session.read().current_device.clone()
    }

    pub fn is_connected(&self) -> bool {
        let session = self.session.read();
        session.status == ConnectionStatus::Connected && session.current_device.is_some()
    }

    /// Text for the status bar.
    pub fn status_text(&self) -> &'static str {
        let session = self.session.read();
        match (session.status, session.connection_type) {
            (ConnectionStatus::Connecting, _) => "Connecting...",
            (ConnectionStatus::Connected, Some(ConnectionType::Wifi)) => "WiFi Connected",
            (ConnectionStatus::Connected, _) if session.current_device.is_some() => {
                "Bluetooth Connected"
            }
            _ => "Disconnected",
        }
    }

    pub fn set_available_devices(&self, devices: Vec<Device>) {
        *self.available_devices.write() = devices;
    }

    pub fn get_available_devices(&self) -> Vec<Device> {
        self.available_devices.read().clone()
    }

    pub fn find_available_device(&self, id: &str) -> Option<Device> {
        self.available_devices
            .read()
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    /// Replace the system info wholesale.
    pub fn set_system_info(&self, info: Option<SystemInfo>) {
        *self.system_info.write() = info;
    }

    pub fn get_system_info(&self) -> Option<SystemInfo> {
        self.system_info.read().clone()
    }

    pub fn add_scan_point(&self, point: ScanPoint) {
        self.scan_area.write().points.push(point);
    }

    pub fn clear_scan_area(&self) {
        self.scan_area.write().points.clear();
    }

    pub fn get_scan_area(&self) -> ScanArea {
        self.scan_area.read().clone()
    }

    pub fn update_servo_position(&self, servo: Servo, angle: u16) {
        self.servo_positions.write().set(servo, angle);
    }

    pub fn get_servo_positions(&self) -> ServoPositions {
        *self.servo_positions.read()
    }

    pub fn set_sensor_data(&self, data: Option<SensorData>) {
        *self.sensor_data.write() = data;
    }

    pub fn get_sensor_data(&self) -> Option<SensorData> {
        self.sensor_data.read().clone()
    }

    pub fn set_emergency_active(&self, active: bool) {
        *self.emergency_active.write() = active;
    }

    pub fn is_emergency_active(&self) -> bool {
        *self.emergency_active.read()
    }

    /// Return every field to its initial value.
    pub fn reset_state(&self) {
        *self.session.write() = Session::disconnected();
        self.available_devices.write().clear();
        *self.system_info.write() = None;
        self.scan_area.write().points.clear();
        *self.servo_positions.write() = ServoPositions::default();
        *self.sensor_data.write() = None;
        *self.emergency_active.write() = false;
    }

    /// Capture the fields that survive a restart.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_device: self.get_current_device(),
            system_info: self.get_system_info(),
        }
    }

    /// Reload persisted fields. The session itself stays `Disconnected`,
    /// so the restored device is only remembered, never treated as live.
    pub fn restore(&self, snapshot: SessionSnapshot) -> Option<Device> {
        *self.system_info.write() = snapshot.system_info;
        snapshot.current_device.map(|d| Device {
            connected: false,
            ..d
        })
    }
}
