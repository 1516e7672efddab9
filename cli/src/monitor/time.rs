use std::time::Duration;

/// Shown when the OS has no estimate, which is normal while plugged in.
pub const UNKNOWN_TIME: &str = "unknown";

/// Format a second count as `H:MM:SS`. Hours are not padded.
pub fn format_hms(seconds: Option<u64>) -> String {
    let Some(seconds) = seconds else {
        return UNKNOWN_TIME.to_string();
    };

    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{}:{:02}:{:02}", hours, mins, secs)
}

pub fn format_remaining(remaining: Option<Duration>) -> String {
    format_hms(remaining.map(|d| d.as_secs()))
}
