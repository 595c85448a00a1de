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

//! Screen handlers.
//!
//! Each handler reads the store, calls a service and writes the outcome
//! back. Failures become a log entry and, for user-initiated actions, an
//! [`Alert`].

pub mod dashboard;
pub mod log_viewer;
pub mod robot;
pub mod scan_area;
pub mod setup;

pub use robot::{ActionStep, QuickAction};

use std::sync::Arc;
use tracing::warn;

use crate::bluetooth::{PairingService, PairingTransport, ProvisioningService};
use crate::config::{Config, MockConfig};
use crate::control::{ControlService, ControlTransport};
use crate::error::ServiceError;
use crate::logs::LogStore;
use crate::protocol::Device;
use crate::state::AppState;
use crate::storage::SessionStorage;
use crate::ui::Alert;

/// Outcome of a screen handler: an optional confirmation, or an error alert.
pub type ScreenResult = std::result::Result<Option<Alert>, Alert>;

/// Everything a screen handler may touch.
pub struct AppContext {
    pub state: Arc<AppState>,
    pub logs: Arc<LogStore>,
    pub pairing: PairingService,
    pub provisioning: ProvisioningService,
    pub control: ControlService,
    pub storage: Option<SessionStorage>,
    pub mock: MockConfig,
    /// Address the robot is reached at once it is on the network.
    pub device_address: String,
}

impl AppContext {
    pub fn new(
        pairing_transport: Arc<dyn PairingTransport>,
        control_transport: Arc<dyn ControlTransport>,
        config: &Config,
        storage: Option<SessionStorage>,
    ) -> Self {
        let logs = LogStore::new();
        Self {
            state: AppState::new(),
            pairing: PairingService::new(pairing_transport.clone(), logs.clone()),
            provisioning: ProvisioningService::new(pairing_transport, logs.clone()),
            control: ControlService::new(control_transport, logs.clone()),
            logs,
            storage,
            mock: config.mock.clone(),
            device_address: config.network.default_device_address.clone(),
        }
    }

    /// Write the persisted part of the store. Failures are logged only.
    pub fn persist(&self) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_state(&self.state) {
                warn!("Failed to save session: {}", e);
            }
        }
    }

    /// Load the persisted session, returning the remembered device.
    pub fn restore(&self) -> Option<Device> {
        let storage = self.storage.as_ref()?;
        self.state.restore(storage.load())
    }

    /// The connected device, or a "not connected" alert.
    pub(crate) fn require_device(&self) -> std::result::Result<Device, Alert> {
        match self.state.get_current_device() {
            Some(device) if self.state.is_connected() => Ok(device),
            _ => Err(Alert::from_service("No device connected", &ServiceError::NotConnected)),
        }
    }
}
