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

//! Line commands accepted by the console.

use crate::config::Theme;
use crate::protocol::{Servo, Task};
use crate::screens::QuickAction;

pub const HELP: &str = "\
Commands:
  scan                      Scan for robots
  connect <id>              Pair with a scanned robot
  disconnect                Drop the current robot
  wifi <ssid> [password]    Provision the robot onto WiFi (quote an ssid with spaces)
  info                      Refresh system info
  status                    Show the dashboard
  point <x> <y>             Add a scan area point (0-1)
  clear-area                Clear the scan area
  send-area                 Submit the scan area
  servo <name> <angle>      Move base|shoulder|elbow|wrist|gripper
  test-servo <name> <angle> Run the servo test on one channel
  action <home|grab|release>
  cmd <task>                calibrate, return_home, system_check, ...
  stop                      Emergency stop
  reset                     Release the emergency stop
  sensors                   Read the sensors
  logs                      Show the log
  clear-logs                Clear the log
  theme <light|dark|system>
  autoconnect <on|off>
  help
  quit";

/// Actions a user can trigger from the console.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleAction {
    Scan,
    Connect(String),
    Disconnect,
    SetupWifi { ssid: String, password: String },
    RefreshInfo,
    Status,
    AddPoint { x: f64, y: f64 },
    ClearArea,
    SendArea,
    MoveServo { servo: Servo, angle: f64 },
    TestServo { servo: Servo, angle: f64 },
    QuickAction(QuickAction),
    Advanced(Task),
    EmergencyStop,
    ResetEmergency,
    Sensors,
    ShowLogs,
    ClearLogs,
    SetTheme(Theme),
    SetAutoConnect(bool),
    Help,
    Quit,
}

impl ConsoleAction {
    /// Parse a console line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();

        let action = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("scan", []) => Self::Scan,
            ("connect", [id]) => Self::Connect(id.to_string()),
            ("disconnect", []) => Self::Disconnect,
            ("wifi", [_, ..]) => {
                let rest = line.trim_start()[verb.len()..].trim();
                let (ssid, password) = split_wifi_args(rest)?;
                Self::SetupWifi { ssid, password }
            }
            ("info", []) => Self::RefreshInfo,
            ("status", []) => Self::Status,
            ("point", [x, y]) => Self::AddPoint {
                x: parse_number(x)?,
                y: parse_number(y)?,
            },
            ("clear-area", []) => Self::ClearArea,
            ("send-area", []) => Self::SendArea,
            ("servo", [name, angle]) => Self::MoveServo {
                servo: Servo::parse(name).ok_or_else(|| format!("Unknown servo: {}", name))?,
                angle: parse_number(angle)?,
            },
            ("test-servo", [name, angle]) => Self::TestServo {
                servo: Servo::parse(name).ok_or_else(|| format!("Unknown servo: {}", name))?,
                angle: parse_number(angle)?,
            },
            ("action", [name]) => Self::QuickAction(
                QuickAction::parse(name).ok_or_else(|| format!("Unknown action: {}", name))?,
            ),
            ("cmd", [task]) => {
                Self::Advanced(Task::parse(task).ok_or_else(|| format!("Unknown task: {}", task))?)
            }
            ("stop", []) => Self::EmergencyStop,
            ("reset", []) => Self::ResetEmergency,
            ("sensors", []) => Self::Sensors,
            ("logs", []) => Self::ShowLogs,
            ("clear-logs", []) => Self::ClearLogs,
            ("theme", [name]) => {
                Self::SetTheme(Theme::parse(name).ok_or_else(|| format!("Unknown theme: {}", name))?)
            }
            ("autoconnect", [flag]) => Self::SetAutoConnect(parse_flag(flag)?),
            ("help", []) => Self::Help,
            ("quit" | "exit", []) => Self::Quit,
            _ => return Err(format!("Unrecognised command: {}", line.trim())),
        };

        Ok(Some(action))
    }
}

/// `<ssid> [password]`. A double-quoted ssid may contain spaces; the
/// password is the rest of the line.
fn split_wifi_args(rest: &str) -> Result<(String, String), String> {
    let (ssid, password) = match rest.strip_prefix('"') {
        Some(quoted) => quoted
            .split_once('"')
            .ok_or_else(|| "Unterminated quote in network name".to_string())?,
        None => rest.split_once(char::is_whitespace).unwrap_or((rest, "")),
    };
    Ok((ssid.to_string(), password.trim().to_string()))
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("Not a number: {}", s))
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(format!("Expected on/off, got {}", s)),
    }
}
