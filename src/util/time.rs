use chrono::{DateTime, Utc};

/// Format the age of `dt` relative to `now`, e.g. "3 days ago".
pub fn relative_age(dt: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

    let days = duration.num_days();
    if days >= 1 {
        return format!("{} ago", plural(days, "day"));
    }

    let hours = duration.num_hours();
    if hours >= 1 {
        return format!("{} ago", plural(hours, "hour"));
    }

    "just now".to_string()
}

/// Short month and day, e.g. "Oct 3".
pub fn short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d").to_string()
}

/// `count` followed by `noun`, pluralised with a trailing "s".
pub fn plural(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
