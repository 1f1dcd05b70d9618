//! Human-readable "time ago" text.

use chrono::{DateTime, Utc};

const INTERVALS: [(i64, &str, &str); 7] = [
    (31_536_000, "year", "years"),
    (2_592_000, "month", "months"),
    (604_800, "week", "weeks"),
    (86_400, "day", "days"),
    (3_600, "hour", "hours"),
    (60, "minute", "minutes"),
    (1, "second", "seconds"),
];

/// Largest whole unit elapsed between `then` and `now`, e.g. `"3 days ago"`.
/// Instants in the future, or less than a second ago, read `"just now"`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).num_seconds();
    if elapsed <= 0 {
        return "just now".to_string();
    }

    INTERVALS
        .iter()
        .find_map(|&(unit, singular, plural)| {
            let count = elapsed / unit;
            (count > 0).then(|| {
                let label = if count == 1 { singular } else { plural };
                format!("{count} {label} ago")
            })
        })
        .unwrap_or_else(|| "just now".to_string())
}
