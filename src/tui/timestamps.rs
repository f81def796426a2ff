use chrono::{DateTime, Datelike, Local, Utc};

/// Format an entry timestamp for the history sidebar:
/// - "Today at 14:32" / "Yesterday at 09:15" for recent entries
/// - "Jan 15, 2026 14:32" otherwise
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_with_reference(timestamp, &Local::now().with_timezone(&Utc))
}

fn format_with_reference(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&Local);
    let local_now = now.with_timezone(&Local);

    let entry_day = local.date_naive();
    let today = local_now.date_naive();

    if entry_day == today {
        format!("Today at {}", local.format("%H:%M"))
    } else if today.pred_opt() == Some(entry_day) {
        format!("Yesterday at {}", local.format("%H:%M"))
    } else if local.year() == local_now.year() {
        local.format("%b %-d %H:%M").to_string()
    } else {
        local.format("%b %-d, %Y %H:%M").to_string()
    }
}
