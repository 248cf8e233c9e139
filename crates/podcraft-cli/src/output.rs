//! Formatted output helpers for CLI commands.

use std::time::Duration;

/// Formats an elapsed duration (e.g., "850ms", "12.3s", "2m05s").
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        return format!("{millis}ms");
    }
    let secs = elapsed.as_secs();
    if secs < 60 {
        return format!("{:.1}s", elapsed.as_secs_f64());
    }
    format!("{}m{:02}s", secs / 60, secs % 60)
}

/// Pluralizes "image" for `count`.
#[must_use]
pub const fn images(count: usize) -> &'static str {
    if count == 1 { "image" } else { "images" }
}
