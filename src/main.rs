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

//! Garbot companion console

use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garbot_companion::bluetooth::MockBluetooth;
use garbot_companion::config::{Config, Theme};
use garbot_companion::control::MockControl;
use garbot_companion::screens::{
    dashboard, log_viewer, robot, scan_area, setup, AppContext, ScreenResult,
};
use garbot_companion::storage::SessionStorage;
use garbot_companion::ui::{ConsoleAction, HELP};

fn report(result: ScreenResult) {
    match result {
        Ok(Some(alert)) | Err(alert) => println!("{}", alert),
        Ok(None) => {}
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

/// Run one console action. Returns false when the user asked to quit.
async fn handle(ctx: &AppContext, config: &mut Config, action: ConsoleAction) -> bool {
    match action {
        ConsoleAction::Scan => {
            report(setup::scan(ctx).await);
            for device in ctx.state.get_available_devices() {
                println!("  {}  {}", device.id, device.name);
            }
        }
        ConsoleAction::Connect(id) => report(setup::connect(ctx, &id).await),
        ConsoleAction::Disconnect => report(setup::disconnect(ctx).await),
        ConsoleAction::SetupWifi { ssid, password } => {
            report(setup::setup_wifi(ctx, &ssid, &password).await)
        }
        ConsoleAction::RefreshInfo => {
            report(dashboard::refresh(ctx).await);
            print_lines(dashboard::render(ctx));
        }
        ConsoleAction::Status => print_lines(dashboard::render(ctx)),
        ConsoleAction::AddPoint { x, y } => {
            report(scan_area::add_point(ctx, x, y, 1.0));
            print_lines(scan_area::render(ctx));
        }
        ConsoleAction::ClearArea => report(scan_area::clear(ctx)),
        ConsoleAction::SendArea => report(scan_area::send(ctx).await),
        ConsoleAction::MoveServo { servo, angle } => {
            report(robot::move_servo(ctx, servo, angle).await)
        }
        ConsoleAction::TestServo { servo, angle } => {
            report(robot::test_servo(ctx, servo, angle).await)
        }
        ConsoleAction::QuickAction(action) => report(robot::run_quick_action(ctx, action).await),
        ConsoleAction::Advanced(task) => report(robot::advanced(ctx, task).await),
        ConsoleAction::EmergencyStop => report(robot::emergency_stop(ctx).await),
        ConsoleAction::ResetEmergency => report(robot::reset_emergency(ctx)),
        ConsoleAction::Sensors => {
            report(robot::refresh_sensors(ctx).await);
            print_lines(dashboard::render(ctx));
        }
        ConsoleAction::ShowLogs => print_lines(log_viewer::render(ctx)),
        ConsoleAction::ClearLogs => report(log_viewer::clear(ctx)),
        ConsoleAction::SetTheme(theme) => {
            config.settings.theme = theme;
            config.settings.use_system_theme = theme == Theme::System;
            save_settings(config);
        }
        ConsoleAction::SetAutoConnect(enabled) => {
            config.settings.auto_connect = enabled;
            save_settings(config);
        }
        ConsoleAction::Help => println!("{}", HELP),
        ConsoleAction::Quit => return false,
    }
    true
}

fn save_settings(config: &Config) {
    match config.save() {
        Ok(()) => info!("Settings saved"),
        Err(e) => error!("Failed to save settings: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("garbot_companion=info".parse()?),
        )
        .init();

    info!("Starting Garbot companion v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = Config::load()?;
    info!("Configuration loaded");

    let storage = SessionStorage::new(&config.data_dir)?;
    info!("Session storage at {}", storage.path().display());

    let ctx = AppContext::new(
        Arc::new(MockBluetooth::new(&config.mock)),
        Arc::new(MockControl::new(&config.mock)),
        &config,
        Some(storage),
    );

    report(setup::request_permissions(&ctx).await);
    report(setup::restore_session(&ctx, config.settings.auto_connect).await);
    print_lines(dashboard::render(&ctx));

    info!("Ready. Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                };
                match ConsoleAction::parse(&line) {
                    Ok(Some(action)) => {
                        if !handle(&ctx, &mut config, action).await {
                            info!("Quit requested");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    ctx.persist();
    info!("Garbot companion stopped");
    Ok(())
}
