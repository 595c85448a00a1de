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

//! Scan area drawing and submission.

use super::{AppContext, ScreenResult};
use crate::error::ServiceError;
use crate::protocol::{ScanPoint, MIN_SCAN_AREA_POINTS};
use crate::ui::Alert;

/// Add a point. `canvas_size` is the drawing surface's edge length in the
/// same unit as `x` and `y`; the stored point is normalized to [0, 1].
pub fn add_point(ctx: &AppContext, x: f64, y: f64, canvas_size: f64) -> ScreenResult {
    let size = if canvas_size > 0.0 { canvas_size } else { 1.0 };
    let point = ScanPoint::clamped(x / size, y / size);

    ctx.state.add_scan_point(point);
    ctx.logs
        .debug(format!("Added point ({:.2}, {:.2})", point.x, point.y));
    Ok(None)
}

pub fn clear(ctx: &AppContext) -> ScreenResult {
    ctx.state.clear_scan_area();
    ctx.logs.info("Cleared scan area");
    Ok(None)
}

/// Submit the drawn polygon to the robot.
pub async fn send(ctx: &AppContext) -> ScreenResult {
    let area = ctx.state.get_scan_area();
    if !area.is_submittable() {
        ctx.logs
            .warning("Need at least 3 points to define a scan area");
        return Err(Alert::from_service(
            "Scan area incomplete",
            &ServiceError::NotEnoughPoints {
                required: MIN_SCAN_AREA_POINTS,
                actual: area.points.len(),
            },
        ));
    }

    ctx.require_device()?;

    match ctx.control.send_scan_area(&area.points).await {
        Ok(_) => {
            ctx.logs.info(format!(
                "Scan area with {} points sent successfully",
                area.points.len()
            ));
            Ok(Some(Alert::info(
                "Scan area",
                format!("{} points sent", area.points.len()),
            )))
        }
        Err(e) => {
            ctx.logs.error(format!("Failed to send scan area: {}", e));
            Err(Alert::from_service("Scan area failed", &e))
        }
    }
}

/// Text rendering of the current polygon.
pub fn render(ctx: &AppContext) -> Vec<String> {
    let area = ctx.state.get_scan_area();
    if area.points.is_empty() {
        return vec!["No points defined".to_string()];
    }
    area.points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}: ({:.2}, {:.2})", i + 1, p.x, p.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::MockBluetooth;
    use crate::config::{Config, MockConfig};
    use crate::control::MockControl;
    use crate::logs::LogLevel;
    use crate::protocol::Device;
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

    #[test]
    fn test_points_are_normalized() {
        let ctx = context();
        add_point(&ctx, 150.0, 75.0, 300.0).unwrap();
        add_point(&ctx, 400.0, -10.0, 300.0).unwrap();

        let points = ctx.state.get_scan_area().points;
        assert_eq!(points[0], ScanPoint { x: 0.5, y: 0.25 });
        assert_eq!(points[1], ScanPoint { x: 1.0, y: 0.0 });
        assert_eq!(ctx.logs.last().unwrap().message, "Added point (1.00, 0.00)");
    }

    #[tokio::test]
    async fn test_send_rejects_small_area() {
        let ctx = context();
        add_point(&ctx, 0.1, 0.1, 1.0).unwrap();
        add_point(&ctx, 0.9, 0.1, 1.0).unwrap();

        let alert = send(&ctx).await.unwrap_err();
        assert!(alert.is_error());
        let last = ctx.logs.last().unwrap();
        assert_eq!(last.level, LogLevel::Warning);
        assert_eq!(last.message, "Need at least 3 points to define a scan area");
    }

    #[tokio::test]
    async fn test_send_and_clear() {
        let ctx = context();
        ctx.state.begin_connecting().unwrap();
        ctx.state.set_connected(Device::new("2", "Garbot_5678")).unwrap();
        ctx.state.set_network_provisioned().unwrap();
        ctx.control.set_base_url("192.168.1.100");

        for (x, y) in [(0.1, 0.1), (0.9, 0.1), (0.5, 0.9)] {
            add_point(&ctx, x, y, 1.0).unwrap();
        }
        assert!(send(&ctx).await.unwrap().is_some());
        assert_eq!(
            ctx.logs.last().unwrap().message,
            "Scan area with 3 points sent successfully"
        );

        clear(&ctx).unwrap();
        assert!(ctx.state.get_scan_area().points.is_empty());
        assert_eq!(render(&ctx), vec!["No points defined".to_string()]);
    }
}
