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

//! Data exchanged with the robot.

use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lowest servo angle in degrees.
pub const SERVO_MIN_ANGLE: u16 = 0;

/// Highest servo angle in degrees.
pub const SERVO_MAX_ANGLE: u16 = 180;

/// Slider granularity in degrees.
pub const SERVO_STEP: u16 = 5;

/// Minimum number of points for a scan area polygon.
pub const MIN_SCAN_AREA_POINTS: usize = 3;

/// A robot found during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
}

impl Device {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connected: false,
            firmware_version: None,
        }
    }
}

/// State of the robot's MQTT broker link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MqttStatus {
    Connected,
    Disconnected,
}

impl MqttStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

/// Network-side system information reported by the robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub ssid: String,
    pub ip_address: String,
    pub mqtt_status: MqttStatus,
    pub firmware_version: String,
}

/// A scan area vertex, normalized to the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanPoint {
    pub x: f64,
    pub y: f64,
}

impl ScanPoint {
    /// Create a point, clamping both coordinates into `[0, 1]`.
    pub fn clamped(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Ordered polygon drawn by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanArea {
    pub points: Vec<ScanPoint>,
}

impl ScanArea {
    pub fn is_submittable(&self) -> bool {
        self.points.len() >= MIN_SCAN_AREA_POINTS
    }
}

/// Arm joints driven by the servo controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Servo {
    Base,
    Shoulder,
    Elbow,
    Wrist,
    Gripper,
}

impl Servo {
    pub const ALL: [Servo; 5] = [
        Servo::Base,
        Servo::Shoulder,
        Servo::Elbow,
        Servo::Wrist,
        Servo::Gripper,
    ];

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "base" => Some(Self::Base),
            "shoulder" => Some(Self::Shoulder),
            "elbow" => Some(Self::Elbow),
            "wrist" => Some(Self::Wrist),
            "gripper" => Some(Self::Gripper),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Shoulder => "shoulder",
            Self::Elbow => "elbow",
            Self::Wrist => "wrist",
            Self::Gripper => "gripper",
        }
    }

    /// PWM channel on the robot's servo driver.
    pub fn channel(&self) -> u8 {
        match self {
            Self::Base => 0,
            Self::Shoulder => 1,
            Self::Elbow => 2,
            Self::Wrist => 3,
            Self::Gripper => 4,
        }
    }
}

/// Round, clamp and snap a raw slider value to a valid servo angle.
pub fn normalize_angle(value: f64) -> u16 {
    if value.is_nan() {
        return SERVO_MIN_ANGLE;
    }
    let clamped = value
        .round()
        .clamp(SERVO_MIN_ANGLE as f64, SERVO_MAX_ANGLE as f64) as u16;
    let step = SERVO_STEP;
    ((clamped + step / 2) / step * step).min(SERVO_MAX_ANGLE)
}

/// Single servo test request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoConfig {
    pub channel: u8,
    pub angle: u16,
}

/// Current angle of every joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoPositions {
    pub base: u16,
    pub shoulder: u16,
    pub elbow: u16,
    pub wrist: u16,
    pub gripper: u16,
}

impl Default for ServoPositions {
    fn default() -> Self {
        Self {
            base: 90,
            shoulder: 90,
            elbow: 90,
            wrist: 90,
            gripper: 0,
        }
    }
}

impl ServoPositions {
    pub fn get(&self, servo: Servo) -> u16 {
        match servo {
            Servo::Base => self.base,
            Servo::Shoulder => self.shoulder,
            Servo::Elbow => self.elbow,
            Servo::Wrist => self.wrist,
            Servo::Gripper => self.gripper,
        }
    }

    pub fn set(&mut self, servo: Servo, angle: u16) {
        let slot = match servo {
            Servo::Base => &mut self.base,
            Servo::Shoulder => &mut self.shoulder,
            Servo::Elbow => &mut self.elbow,
            Servo::Wrist => &mut self.wrist,
            Servo::Gripper => &mut self.gripper,
        };
        *slot = angle.min(SERVO_MAX_ANGLE);
    }
}

/// Operational tasks understood by the robot's control API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    StartWeed,
    StartMoss,
    Stop,
    Scan,
    ServoTest,
    MoveServo,
    Calibrate,
    ReturnHome,
    SystemCheck,
    EmergencyStop,
}

impl Task {
    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "start_weed" => Some(Self::StartWeed),
            "start_moss" => Some(Self::StartMoss),
            "stop" => Some(Self::Stop),
            "scan" => Some(Self::Scan),
            "servo_test" => Some(Self::ServoTest),
            "move_servo" => Some(Self::MoveServo),
            "calibrate" => Some(Self::Calibrate),
            "return_home" => Some(Self::ReturnHome),
            "system_check" => Some(Self::SystemCheck),
            "emergency_stop" => Some(Self::EmergencyStop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartWeed => "start_weed",
            Self::StartMoss => "start_moss",
            Self::Stop => "stop",
            Self::Scan => "scan",
            Self::ServoTest => "servo_test",
            Self::MoveServo => "move_servo",
            Self::Calibrate => "calibrate",
            Self::ReturnHome => "return_home",
            Self::SystemCheck => "system_check",
            Self::EmergencyStop => "emergency_stop",
        }
    }
}

/// A command posted to the control channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub task: Task,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl Command {
    pub fn new(task: Task) -> Self {
        Self { task, params: None }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Command that moves a single joint over the network channel.
    pub fn move_servo(servo: Servo, angle: u16) -> Self {
        Self::new(Task::MoveServo)
            .with_param("servo", servo.as_str())
            .with_param("angle", angle)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json.trim())?)
    }
}

/// Telemetry sample from the robot's sensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    /// Ultrasonic distance in centimetres.
    pub distance: f64,
    /// Tilt sensor reading in volts.
    pub tilt_x: f64,
    pub obstacle: bool,
    pub timestamp: DateTime<Local>,
}

/// Coarse range buckets for the ultrasonic reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceClass {
    VeryClose,
    Close,
    Medium,
    Far,
}

impl DistanceClass {
    pub fn from_cm(distance: f64) -> Self {
        if distance < 10.0 {
            Self::VeryClose
        } else if distance < 25.0 {
            Self::Close
        } else if distance < 50.0 {
            Self::Medium
        } else {
            Self::Far
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryClose => "very close",
            Self::Close => "close",
            Self::Medium => "medium",
            Self::Far => "far",
        }
    }
}

/// Tilt buckets on the absolute sensor voltage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltClass {
    Stable,
    Tilted,
    StronglyTilted,
}

impl TiltClass {
    pub fn from_volts(tilt: f64) -> Self {
        let abs = tilt.abs();
        if abs < 0.5 {
            Self::Stable
        } else if abs < 1.0 {
            Self::Tilted
        } else {
            Self::StronglyTilted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Tilted => "tilted",
            Self::StronglyTilted => "strongly tilted",
        }
    }
}
