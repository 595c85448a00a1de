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

//! Robot controller: servo sliders, quick actions, emergency stop,
//! advanced commands and sensor refresh.

use super::{AppContext, ScreenResult};
use crate::error::{ServiceError, ServiceResult};
use crate::protocol::{normalize_angle, Command, Device, Servo, ServoConfig, Task};
use crate::state::ConnectionType;
use crate::ui::Alert;

/// One servo move inside a quick action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStep {
    pub servo: Servo,
    pub angle: u16,
    /// Pause after the move, before the next step.
    pub delay_ms: u64,
}

const fn step(servo: Servo, angle: u16, delay_ms: u64) -> ActionStep {
    ActionStep {
        servo,
        angle,
        delay_ms,
    }
}

const HOME_STEPS: [ActionStep; 5] = [
    step(Servo::Base, 90, 500),
    step(Servo::Shoulder, 90, 500),
    step(Servo::Elbow, 90, 500),
    step(Servo::Wrist, 90, 500),
    step(Servo::Gripper, 0, 500),
];

const GRAB_STEPS: [ActionStep; 4] = [
    step(Servo::Shoulder, 45, 1000),
    step(Servo::Elbow, 45, 1000),
    step(Servo::Wrist, 90, 1000),
    step(Servo::Gripper, 180, 500),
];

const RELEASE_STEPS: [ActionStep; 2] = [
    step(Servo::Gripper, 0, 500),
    step(Servo::Shoulder, 90, 500),
];

/// Preset servo sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Home,
    Grab,
    Release,
}

impl QuickAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "grab" => Some(Self::Grab),
            "release" => Some(Self::Release),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Grab => "Grab",
            Self::Release => "Release",
        }
    }

    pub fn steps(&self) -> &'static [ActionStep] {
        match self {
            Self::Home => &HOME_STEPS,
            Self::Grab => &GRAB_STEPS,
            Self::Release => &RELEASE_STEPS,
        }
    }
}

/// Send a command over whichever link the robot is on.
async fn dispatch(ctx: &AppContext, device: &Device, command: &Command) -> ServiceResult<bool> {
    match ctx.state.get_connection_type() {
        Some(ConnectionType::Wifi) => ctx.control.send_command(command).await,
        Some(ConnectionType::Bluetooth) => ctx.pairing.send_command(&device.id, command).await,
        None => Err(ServiceError::NotConnected),
    }
}

fn emergency_alert() -> Alert {
    Alert::error(
        "Emergency stop active",
        "Reset the emergency stop before moving the robot",
    )
}

/// Snap `value` to a valid angle, store it and send it to the robot.
pub async fn move_servo(ctx: &AppContext, servo: Servo, value: f64) -> ScreenResult {
    if ctx.state.is_emergency_active() {
        return Err(emergency_alert());
    }
    let device = ctx.require_device()?;

    let angle = normalize_angle(value);
    ctx.state.update_servo_position(servo, angle);

    let command = match ctx.state.get_connection_type() {
        Some(ConnectionType::Bluetooth) => Command::new(Task::ServoTest)
            .with_param("channel", servo.channel())
            .with_param("angle", angle),
        _ => Command::move_servo(servo, angle),
    };

    match dispatch(ctx, &device, &command).await {
        Ok(_) => {
            ctx.logs
                .debug(format!("{} servo moved to {}°", servo.as_str(), angle));
            Ok(None)
        }
        Err(e) => {
            ctx.logs
                .error(format!("Failed to move {} servo: {}", servo.as_str(), e));
            Err(Alert::from_service("Servo error", &e))
        }
    }
}

/// Run a single channel through the control API's servo test.
pub async fn test_servo(ctx: &AppContext, servo: Servo, value: f64) -> ScreenResult {
    if ctx.state.is_emergency_active() {
        return Err(emergency_alert());
    }
    ctx.require_device()?;

    let config = ServoConfig {
        channel: servo.channel(),
        angle: normalize_angle(value),
    };

    match ctx.control.test_servo(config).await {
        Ok(_) => {
            ctx.state.update_servo_position(servo, config.angle);
            Ok(Some(Alert::info(
                "Servo test",
                format!("{} servo tested at {}°", servo.as_str(), config.angle),
            )))
        }
        Err(e) => {
            ctx.logs.error(format!("Servo test failed: {}", e));
            Err(Alert::from_service("Servo test failed", &e))
        }
    }
}

/// Play a preset sequence. Stops at the first failed step or if the
/// emergency stop is raised between steps.
pub async fn run_quick_action(ctx: &AppContext, action: QuickAction) -> ScreenResult {
    if ctx.state.is_emergency_active() {
        return Err(emergency_alert());
    }
    ctx.require_device()?;

    ctx.logs
        .info(format!("Running quick action: {}", action.name()));

    let steps = action.steps();
    for (i, step) in steps.iter().enumerate() {
        move_servo(ctx, step.servo, f64::from(step.angle)).await?;

        if i + 1 < steps.len() {
            tokio::time::sleep(ctx.mock.action_delay(step.delay_ms)).await;
        }
    }

    ctx.logs
        .info(format!("Quick action {} completed", action.name()));
    Ok(Some(Alert::info(
        "Quick action",
        format!("{} completed", action.name()),
    )))
}

/// Latch the emergency stop. Over WiFi the robot is told to halt as well.
pub async fn emergency_stop(ctx: &AppContext) -> ScreenResult {
    ctx.state.set_emergency_active(true);
    ctx.logs.warning("Emergency stop activated");

    if ctx.state.get_connection_type() == Some(ConnectionType::Wifi) {
        if let Err(e) = ctx.control.send_command(&Command::new(Task::EmergencyStop)).await {
            ctx.logs
                .error(format!("Failed to send emergency stop: {}", e));
            return Err(Alert::from_service("Emergency stop", &e));
        }
    }

    Ok(Some(Alert::info(
        "Emergency stop",
        "All movement stopped",
    )))
}

pub fn reset_emergency(ctx: &AppContext) -> ScreenResult {
    if !ctx.state.is_emergency_active() {
        return Ok(None);
    }
    ctx.state.set_emergency_active(false);
    ctx.logs.info("Emergency stop reset");
    Ok(Some(Alert::info("Emergency stop", "Movement enabled")))
}

/// Send one of the advanced tasks.
pub async fn advanced(ctx: &AppContext, task: Task) -> ScreenResult {
    if task == Task::EmergencyStop {
        return emergency_stop(ctx).await;
    }
    let device = ctx.require_device()?;

    match dispatch(ctx, &device, &Command::new(task)).await {
        Ok(_) => Ok(Some(Alert::info(
            "Command sent",
            format!("{} sent to {}", task.as_str(), device.name),
        ))),
        Err(e) => {
            ctx.logs
                .error(format!("Failed to send {}: {}", task.as_str(), e));
            Err(Alert::from_service("Command failed", &e))
        }
    }
}

/// Read the sensors into the store.
pub async fn refresh_sensors(ctx: &AppContext) -> ScreenResult {
    ctx.require_device()?;

    match ctx.control.read_sensors().await {
        Ok(data) => {
            ctx.state.set_sensor_data(Some(data));
            Ok(None)
        }
        Err(e) => {
            ctx.logs.error(format!("Failed to read sensors: {}", e));
            Err(Alert::from_service("Sensors unavailable", &e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::MockBluetooth;
    use crate::config::{Config, MockConfig};
    use crate::control::MockControl;
    use crate::protocol::ServoPositions;
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

    fn connect_bluetooth(ctx: &AppContext) {
        ctx.state.begin_connecting().unwrap();
        ctx.state.set_connected(Device::new("1", "Garbot_1234")).unwrap();
    }

    fn connect_wifi(ctx: &AppContext) {
        connect_bluetooth(ctx);
        ctx.state.set_network_provisioned().unwrap();
        ctx.control.set_base_url("192.168.1.100");
    }

    #[test]
    fn test_quick_action_steps() {
        assert_eq!(QuickAction::parse("GRAB"), Some(QuickAction::Grab));
        assert_eq!(QuickAction::parse("wave"), None);

        let home = QuickAction::Home.steps();
        assert_eq!(home.len(), 5);
        assert!(home.iter().all(|s| s.delay_ms == 500));
        assert_eq!(home[4], step(Servo::Gripper, 0, 500));

        let grab = QuickAction::Grab.steps();
        assert_eq!(grab[0], step(Servo::Shoulder, 45, 1000));
        assert_eq!(grab[3], step(Servo::Gripper, 180, 500));

        assert_eq!(QuickAction::Release.steps().len(), 2);
    }

    #[tokio::test]
    async fn test_move_servo_snaps_and_stores() {
        let ctx = context();
        connect_bluetooth(&ctx);

        move_servo(&ctx, Servo::Elbow, 47.6).await.unwrap();
        assert_eq!(ctx.state.get_servo_positions().elbow, 50);

        move_servo(&ctx, Servo::Base, 260.0).await.unwrap();
        assert_eq!(ctx.state.get_servo_positions().base, 180);
    }

    #[tokio::test]
    async fn test_move_servo_requires_connection() {
        let ctx = context();
        let alert = move_servo(&ctx, Servo::Base, 10.0).await.unwrap_err();
        assert!(alert.is_error());
        assert_eq!(ctx.state.get_servo_positions(), ServoPositions::default());
    }

    #[tokio::test]
    async fn test_emergency_stop_locks_movement() {
        let ctx = context();
        connect_wifi(&ctx);

        emergency_stop(&ctx).await.unwrap();
        assert!(ctx.state.is_emergency_active());
        assert!(move_servo(&ctx, Servo::Wrist, 30.0).await.is_err());
        assert!(run_quick_action(&ctx, QuickAction::Home).await.is_err());
        assert_eq!(ctx.state.get_servo_positions().wrist, 90);

        reset_emergency(&ctx).unwrap();
        move_servo(&ctx, Servo::Wrist, 30.0).await.unwrap();
        assert_eq!(ctx.state.get_servo_positions().wrist, 30);
    }

    #[tokio::test]
    async fn test_quick_action_moves_every_servo() {
        let ctx = context();
        connect_wifi(&ctx);

        run_quick_action(&ctx, QuickAction::Grab).await.unwrap();
        let positions = ctx.state.get_servo_positions();
        assert_eq!(positions.shoulder, 45);
        assert_eq!(positions.elbow, 45);
        assert_eq!(positions.gripper, 180);

        run_quick_action(&ctx, QuickAction::Home).await.unwrap();
        assert_eq!(ctx.state.get_servo_positions(), ServoPositions::default());
    }

    #[tokio::test]
    async fn test_advanced_emergency_routes_to_stop() {
        let ctx = context();
        connect_bluetooth(&ctx);

        advanced(&ctx, Task::EmergencyStop).await.unwrap();
        assert!(ctx.state.is_emergency_active());
    }

    #[tokio::test]
    async fn test_sensors_need_network() {
        let ctx = context();
        connect_bluetooth(&ctx);
        assert!(refresh_sensors(&ctx).await.is_err());

        ctx.control.set_base_url("192.168.1.100");
        refresh_sensors(&ctx).await.unwrap();
        let data = ctx.state.get_sensor_data().unwrap();
        assert!((data.distance - 42.5).abs() < f64::EPSILON);
    }
}
