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

//! Status overview and system info.

use super::{AppContext, ScreenResult};
use crate::protocol::{DistanceClass, Servo, TiltClass};
use crate::ui::Alert;

/// Query the robot's system info and replace the stored copy.
/// Skipped unless a robot is connected.
pub async fn fetch_system_info(ctx: &AppContext) -> ScreenResult {
    if !ctx.state.is_connected() {
        return Ok(None);
    }

    ctx.control.set_base_url(&ctx.device_address);

    match ctx.control.get_system_info().await {
        Ok(info) => {
            ctx.state.set_system_info(Some(info));
            ctx.logs.info("System information updated");
            ctx.persist();
            Ok(None)
        }
        Err(e) => {
            ctx.logs
                .error(format!("Failed to fetch system info: {}", e));
            Err(Alert::from_service("System info unavailable", &e))
        }
    }
}

/// Pull-to-refresh equivalent.
pub async fn refresh(ctx: &AppContext) -> ScreenResult {
    fetch_system_info(ctx).await
}

/// One-line status bar.
pub fn status_line(ctx: &AppContext) -> String {
    let mut line = ctx.state.status_text().to_string();
    if let Some(info) = ctx.state.get_system_info() {
        line.push_str(&format!(
            " | {} | MQTT {}",
            info.ssid,
            info.mqtt_status.as_str()
        ));
    }
    line
}

/// Text rendering of the dashboard.
pub fn render(ctx: &AppContext) -> Vec<String> {
    let mut lines = vec![status_line(ctx)];

    let device = match ctx.state.get_current_device() {
        Some(device) if ctx.state.is_connected() => device,
        _ => {
            lines.push("Welcome to Garbot".to_string());
            lines.push("Scan and connect to your Garbot device to get started.".to_string());
            return lines;
        }
    };

    let via = ctx
        .state
        .get_connection_type()
        .map(|t| t.as_str())
        .unwrap_or("-");
    lines.push(format!("{} - Connected via {}", device.name, via));

    if let Some(info) = ctx.state.get_system_info() {
        lines.push(format!("  Network:  {}", info.ssid));
        lines.push(format!("  Address:  {}", info.ip_address));
        lines.push(format!("  MQTT:     {}", info.mqtt_status.as_str()));
        lines.push(format!("  Firmware: {}", info.firmware_version));
    }

    let servos = ctx.state.get_servo_positions();
    let joints: Vec<String> = Servo::ALL
        .iter()
        .map(|s| format!("{} {}°", s.as_str(), servos.get(*s)))
        .collect();
    lines.push(format!("  Servos:   {}", joints.join(" ")));

    if let Some(sensors) = ctx.state.get_sensor_data() {
        lines.push(format!(
            "  Distance: {:.1} cm ({})",
            sensors.distance,
            DistanceClass::from_cm(sensors.distance).as_str()
        ));
        lines.push(format!(
            "  Tilt:     {:.2} V ({})",
            sensors.tilt_x,
            TiltClass::from_volts(sensors.tilt_x).as_str()
        ));
        lines.push(format!(
            "  Obstacle: {}",
            if sensors.obstacle { "detected" } else { "clear" }
        ));
        lines.push(format!(
            "  Updated:  {}",
            sensors.timestamp.format("%H:%M:%S")
        ));
    }

    let points = ctx.state.get_scan_area().points.len();
    lines.push(format!("  Scan area: {} points", points));

    if ctx.state.is_emergency_active() {
        lines.push("  EMERGENCY STOP ACTIVE - all movement stopped".to_string());
    }

    lines
}
