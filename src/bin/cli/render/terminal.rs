use chrono::{DateTime, Utc};

use mnemo_lib::flashcards::algorithm::format_interval;

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap `text` in an ANSI color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Left-align `text` to `width` columns, then paint it, so escape codes
/// do not count towards the column width
pub fn paint_padded(text: &str, width: usize, color: &str, use_color: bool) -> String {
    paint(&format!("{:<width$}", text, width = width), color, use_color)
}

/// Describe a due date relative to `now`, e.g. "overdue 2d" or "in 6d"
pub fn describe_due(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (due - now).num_seconds() as f64 / 86_400.0;
    if days <= 0.0 {
        let overdue = -days;
        if overdue < 1.0 / 24.0 {
            "due now".to_string()
        } else {
            format!("overdue {}", format_interval(overdue))
        }
    } else {
        format!("in {}", format_interval(days))
    }
}

/// Truncate to at most `max` characters, adding an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_describe_due() {
        let now = Utc::now();
        assert_eq!(describe_due(now, now), "due now");
        assert_eq!(describe_due(now - Duration::days(2), now), "overdue 2d");
        assert_eq!(describe_due(now + Duration::days(6), now), "in 6d");
        assert_eq!(describe_due(now + Duration::hours(12), now), "in 12h");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 8), "a longe…");
    }

    #[test]
    fn test_paint() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_paint_padded_pads_visible_text() {
        let plain = paint_padded("processed", 11, Color::GREEN, false);
        let colored = paint_padded("processed", 11, Color::GREEN, true);

        assert_eq!(plain, "processed  ");
        assert_eq!(colored, format!("{}processed  {}", Color::GREEN, Color::RESET));
    }
}
