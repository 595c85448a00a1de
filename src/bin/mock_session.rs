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

//! Scripted walk through a full session against the mock transports.
//!
//! Usage: cargo run --bin mock_session -- [ssid] [password]

use anyhow::Result;
use garbot_companion::bluetooth::{MockBluetooth, MOCK_DEVICES};
use garbot_companion::config::{Config, MockConfig};
use garbot_companion::control::MockControl;
use garbot_companion::protocol::{Servo, Task};
use garbot_companion::screens::{
    dashboard, log_viewer, robot, scan_area, setup, AppContext, QuickAction, ScreenResult,
};
use std::env;
use std::sync::Arc;

fn step(name: &str, result: ScreenResult) {
    match result {
        Ok(Some(alert)) => println!("{:<12} {}", name, alert),
        Ok(None) => println!("{:<12} ok", name),
        Err(alert) => println!("{:<12} {}", name, alert),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let ssid = args.get(1).map(|s| s.as_str()).unwrap_or("HomeWiFi");
    let password = args.get(2).map(|s| s.as_str()).unwrap_or("");

    let mut config = Config::default();
    config.mock = MockConfig::instant();

    let ctx = AppContext::new(
        Arc::new(MockBluetooth::new(&config.mock)),
        Arc::new(MockControl::new(&config.mock)),
        &config,
        None,
    );

    step("permissions", setup::request_permissions(&ctx).await);
    step("scan", setup::scan(&ctx).await);
    step("connect", setup::connect(&ctx, MOCK_DEVICES[0].0).await);
    step("wifi", setup::setup_wifi(&ctx, ssid, password).await);
    step("info", dashboard::fetch_system_info(&ctx).await);
    step("servo", robot::move_servo(&ctx, Servo::Elbow, 62.0).await);
    step("grab", robot::run_quick_action(&ctx, QuickAction::Grab).await);
    step("calibrate", robot::advanced(&ctx, Task::Calibrate).await);
    step("sensors", robot::refresh_sensors(&ctx).await);

    for (x, y) in [(0.1, 0.1), (0.9, 0.1), (0.9, 0.9), (0.1, 0.9)] {
        step("point", scan_area::add_point(&ctx, x, y, 1.0));
    }
    step("send-area", scan_area::send(&ctx).await);

    println!();
    for line in dashboard::render(&ctx) {
        println!("{}", line);
    }

    println!();
    for line in log_viewer::render(&ctx) {
        println!("{}", line);
    }

    step("disconnect", setup::disconnect(&ctx).await);
    Ok(())
}
