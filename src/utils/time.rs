//! Duration and timestamp formatting for console output.

use chrono::{DateTime, Utc};

/// Render whole seconds as `2h 15m 33s` (segments left out when zero).
pub fn fmt_duration(secs: i64) -> String {
    if secs <= 0 {
        return "0s".to_string();
    }

    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;

    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{}h ", h));
    }
    if m > 0 {
        out.push_str(&format!("{}m ", m));
    }
    if s > 0 || out.is_empty() {
        out.push_str(&format!("{}s", s));
    }
    out.trim_end().to_string()
}

/// Compact local-display form of a stored UTC timestamp.
pub fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `--` placeholder for still-open fields.
pub fn fmt_opt_ts(ts: &Option<DateTime<Utc>>) -> String {
    ts.as_ref().map(fmt_ts).unwrap_or_else(|| "--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_segments() {
        assert_eq!(fmt_duration(0), "0s");
        assert_eq!(fmt_duration(-5), "0s");
        assert_eq!(fmt_duration(59), "59s");
        assert_eq!(fmt_duration(60), "1m");
        assert_eq!(fmt_duration(3661), "1h 1m 1s");
        assert_eq!(fmt_duration(5413), "1h 30m 13s");
    }
}
