use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Elapsed seconds as "HH:MM:SS". Fields are zero-padded to two digits;
/// hours grow beyond two digits instead of wrapping.
pub fn format_elapsed(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Utilization fraction as a percentage cell, e.g. 0.0756 -> "7.6".
pub fn format_percent(fraction: f64) -> String {
    format!("{:.1}", fraction * 100.0)
}

/// Resident set kB as whole megabytes (divisor 1024, consistently).
pub fn format_ram_mb(rss_kb: u64) -> String {
    format!("{} MB", rss_kb / 1024)
}
