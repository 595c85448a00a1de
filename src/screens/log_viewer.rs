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

//! Log viewer.

use super::{AppContext, ScreenResult};
use crate::logs::LogEntry;

fn format_entry(entry: &LogEntry) -> String {
    format!(
        "{} [{}] {}",
        entry.timestamp.format("%H:%M:%S"),
        entry.level.as_str(),
        entry.message
    )
}

/// One line per entry, oldest first.
pub fn render(ctx: &AppContext) -> Vec<String> {
    let entries = ctx.logs.entries();
    if entries.is_empty() {
        return vec!["No logs available".to_string()];
    }
    entries.iter().map(format_entry).collect()
}

pub fn clear(ctx: &AppContext) -> ScreenResult {
    ctx.logs.clear();
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::MockBluetooth;
    use crate::config::Config;
    use crate::control::MockControl;
    use std::sync::Arc;

    #[test]
    fn test_render_and_clear() {
        let ctx = AppContext::new(
            Arc::new(MockBluetooth::instant()),
            Arc::new(MockControl::instant()),
            &Config::default(),
            None,
        );
        assert_eq!(render(&ctx), vec!["No logs available".to_string()]);

        ctx.logs.warning("Low battery");
        let lines = render(&ctx);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("[WARN] Low battery"));
        assert_eq!(lines[0].len(), "00:00:00 [WARN] Low battery".len());

        clear(&ctx).unwrap();
        assert_eq!(render(&ctx), vec!["No logs available".to_string()]);
    }
}
