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

//! Error types surfaced at the service boundary.

use thiserror::Error;

use crate::state::ConnectionStatus;

/// Failures reported by the pairing, provisioning and control services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("a scan is already in progress")]
    ScanInProgress,
    #[error("scan error: {0}")]
    ScanFailed(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("base URL not set")]
    BaseUrlNotSet,
    #[error("network name must not be empty")]
    EmptySsid,
    #[error("no device connected")]
    NotConnected,
    #[error("need at least {required} points to define a scan area, got {actual}")]
    NotEnoughPoints { required: usize, actual: usize },
    #[error("transport error: {0}")]
    Transport(String),
}

/// A rejected connection state change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: &'static str },
}

impl SessionError {
    pub(crate) fn invalid(from: ConnectionStatus, transport: Option<&str>, to: &'static str) -> Self {
        let from = match transport {
            Some(t) => format!("{} ({})", from.as_str(), t),
            None => from.as_str().to_string(),
        };
        SessionError::InvalidTransition { from, to }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
