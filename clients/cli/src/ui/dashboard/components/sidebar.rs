//! Dashboard sidebar component
//!
//! Renders the role's modules and session uptime

use super::super::state::DashboardState;
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

pub fn render_sidebar(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let mut lines: Vec<Line> = state
        .shell
        .entries()
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let mounted = *key == state.shell.selected();
            let style = if mounted {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(format!(" {} ", key.title()), style),
            ])
        })
        .collect();

    let uptime = state.start_time.elapsed().as_secs();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Sesión {}h {}m", uptime / 3600, (uptime % 3600) / 60),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title("MÓDULOS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
