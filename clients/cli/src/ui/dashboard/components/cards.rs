//! Dashboard metric cards component
//!
//! Renders the module's figures as a row of boxes

use crate::ui::metrics::MetricCard;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Cards wider than this many per row are squeezed past readability.
const MAX_CARDS_PER_ROW: usize = 6;

pub fn render_cards(f: &mut Frame, area: ratatui::layout::Rect, cards: &[MetricCard]) {
    let shown = &cards[..cards.len().min(MAX_CARDS_PER_ROW)];
    if shown.is_empty() {
        return;
    }
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, shown.len() as u32); shown.len()])
        .split(area);

    for (card, chunk) in shown.iter().zip(chunks.iter()) {
        let mut lines = vec![Line::from(Span::styled(
            card.value.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))];
        if card.variation.is_some() {
            lines.push(Line::from(Span::styled(
                card.variation_label(),
                Style::default().fg(card.variation_color()),
            )));
        }
        let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .title(card.label.clone())
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::LightBlue)),
        );
        f.render_widget(widget, *chunk);
    }
}
