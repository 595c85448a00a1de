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

//! Short-range link to the robot.
//!
//! Discovery, pairing and credential hand-off go through a
//! [`PairingTransport`]; the services here add logging and the scan guard.

mod mock;
mod pairing;
mod provisioning;
mod transport;

pub use mock::{MockBluetooth, MOCK_DEVICES};
pub use pairing::PairingService;
pub use provisioning::ProvisioningService;
pub use transport::PairingTransport;
