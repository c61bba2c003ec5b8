//! Short "time since" labels for the conversation list.
//!
//! Buckets follow the usual humanized "from now" rounding: each unit is
//! rounded to the nearest whole value and the next unit takes over once the
//! rounded count passes its threshold.
//!
//! | rounded elapsed      | label     |
//! |----------------------|-----------|
//! | future, <= 44 s      | `Agora`   |
//! | <= 89 s              | `1m`      |
//! | <= 44 min            | `{n}m`    |
//! | <= 89 min            | `1h`      |
//! | <= 21 h              | `{n}h`    |
//! | <= 35 h              | `1d`      |
//! | <= 25 d              | `{n}d`    |
//! | <= 45 d              | `1mo`     |
//! | <= 10 mo             | `{n}mo`   |
//! | <= 17 mo             | `1y`      |
//! | beyond               | `{n}y`    |

use atende_core::Timestamp;
use chrono::{DateTime, Utc};

/// Label used when a timestamp is missing or unreadable.
pub const DEFAULT_LABEL: &str = "1d";

/// Label for anything under a minute old (or in the future).
pub const NOW_LABEL: &str = "Agora";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Integer division rounding half up.
const fn rounded(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

/// Format the time elapsed between `instant` and `now`.
#[must_use]
pub fn format_relative(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - instant).num_seconds();
    if seconds <= 44 {
        return NOW_LABEL.to_string();
    }
    if seconds <= 89 {
        return "1m".to_string();
    }

    let minutes = rounded(seconds, MINUTE);
    if minutes <= 44 {
        return format!("{minutes}m");
    }
    if minutes <= 89 {
        return "1h".to_string();
    }

    let hours = rounded(seconds, HOUR);
    if hours <= 21 {
        return format!("{}h", hours.max(1));
    }
    if hours <= 35 {
        return "1d".to_string();
    }

    let days = rounded(seconds, DAY);
    if days <= 25 {
        return format!("{}d", days.max(1));
    }
    if days <= 45 {
        return "1mo".to_string();
    }

    // 30.4375 and 365.25 days, scaled to stay in integers.
    let months = rounded(days * 10_000, 304_375);
    if months <= 10 {
        return format!("{}mo", months.max(1));
    }
    if months <= 17 {
        return "1y".to_string();
    }

    let years = rounded(days * 100, 36_525);
    format!("{}y", years.max(1))
}

/// Label for an optional wire timestamp, or `None` if it cannot be read.
#[must_use]
pub fn relative_label(timestamp: Option<&Timestamp>, now: DateTime<Utc>) -> Option<String> {
    timestamp
        .and_then(Timestamp::to_utc)
        .map(|instant| format_relative(instant, now))
}

/// Like [`relative_label`], falling back to [`DEFAULT_LABEL`].
#[must_use]
pub fn relative_label_or_default(timestamp: Option<&Timestamp>, now: DateTime<Utc>) -> String {
    relative_label(timestamp, now).unwrap_or_else(|| DEFAULT_LABEL.to_string())
}
