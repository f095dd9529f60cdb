use chrono::{DateTime, Utc};

/// Compact "how long ago" label for listings and activity feeds.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - timestamp;
    let mins = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if mins < 1 {
        "Just now".to_string()
    } else if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{days} days ago")
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

pub fn format_duration(seconds: u32) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let mins = seconds / 60;
    let secs = seconds % 60;
    if secs > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{mins}m")
    }
}
