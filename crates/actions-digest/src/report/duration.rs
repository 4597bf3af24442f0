//! Duration and percentage formatting shared by the report styles.

/// Placeholder for steps whose duration could not be derived.
pub const UNKNOWN_DURATION: &str = "N/A";

/// Format a duration for prose (e.g., "2h 3m 4s", "45s", "320ms").
pub fn format_human(ms: u64) -> String {
    if ms < 1000 {
        return format!("{ms}ms");
    }
    let secs = ms / 1000;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else if m > 0 {
        format!("{m}m {s}s")
    } else {
        format!("{s}s")
    }
}

/// Format a duration as a clock reading: `H:MM:SS` past an hour, else `M:SS`.
pub fn format_clock(ms: u64) -> String {
    let secs = ms / 1000;
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn format_human_opt(ms: Option<u64>) -> String {
    ms.map(format_human)
        .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
}

pub fn format_clock_opt(ms: Option<u64>) -> String {
    ms.map(format_clock)
        .unwrap_or_else(|| UNKNOWN_DURATION.to_string())
}

/// `part` as a percentage of `total`; a zero total yields 0.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// One-decimal percentage, e.g. "76.9%".
pub fn format_percent(pct: f64) -> String {
    format!("{pct:.1}%")
}

/// Whole-number percentage with halves rounded up, e.g. "67%".
pub fn format_whole_percent(pct: f64) -> String {
    format!("{}%", pct.round())
}
