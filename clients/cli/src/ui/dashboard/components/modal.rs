//! Dashboard overlays
//!
//! Renders the detail modal and the delete confirmation on top of the table

use super::super::utils::centered_rect;
use crate::ui::screen::ModalView;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

pub fn render_modal(f: &mut Frame, area: ratatui::layout::Rect, modal: &ModalView) {
    let popup = centered_rect(60, 80, area);
    f.render_widget(Clear, popup);

    let label_width = modal
        .fields
        .iter()
        .map(|field| field.label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = modal
        .fields
        .iter()
        .map(|field| {
            let label_style = if field.focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let value_style = if !field.editable {
                Style::default().fg(Color::DarkGray)
            } else if field.focused {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if field.focused { "▏" } else { "" };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}  ", field.label, width = label_width),
                    label_style,
                ),
                Span::styled(format!("{}{}", field.value, cursor), value_style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    if let Some(error) = &modal.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )));
    }
    if modal.submitting {
        lines.push(Line::from(Span::styled(
            "Guardando…",
            Style::default().fg(Color::LightBlue),
        )));
    }

    let block = Block::default()
        .title(modal.title.clone())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow))
        .padding(Padding::uniform(1));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

pub fn render_confirm(f: &mut Frame, area: ratatui::layout::Rect, question: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .title("Confirmar")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightRed))
        .padding(Padding::uniform(1));
    let widget = Paragraph::new(question.to_string())
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(widget, popup);
}
