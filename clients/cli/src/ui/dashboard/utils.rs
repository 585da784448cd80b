//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::{EventType, Source};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::Color;

/// Get a ratatui color for an activity entry based on where it came from
pub fn get_source_color(source: &Source, event_type: EventType) -> Color {
    match (source, event_type) {
        (_, EventType::Error) => Color::LightRed,
        (_, EventType::Success) => Color::Green,
        (Source::Session, _) => Color::Cyan,
        (Source::Module(_), _) => Color::Yellow,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" -> "MM-DD HH:MM"
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

/// A rectangle of the given percentage size centered in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Cuts a cell to `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_timestamp_drops_year_and_seconds() {
        assert_eq!(format_compact_timestamp("2024-05-20 14:03:59"), "05-20 14:03");
        assert_eq!(format_compact_timestamp("ayer"), "ayer");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Bodega Sol", 20), "Bodega Sol");
        assert_eq!(truncate("Ferretería Hnos", 6), "Ferre…");
    }
}
