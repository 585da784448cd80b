//! Dashboard footer component
//!
//! Renders the key hints of the mounted module

use crate::ui::screen::ScreenView;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, view: &ScreenView) {
    let mut spans = Vec::new();
    for (key, label) in &view.hints {
        spans.push(Span::styled(
            format!("[{}]", key),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    spans.push(Span::styled(
        "[Tab/1-9] módulo  [Q] salir",
        Style::default().fg(Color::DarkGray),
    ));

    let footer = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
