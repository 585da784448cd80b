//! Dashboard header component
//!
//! Renders the title and who is signed in

use super::super::state::DashboardState;
use crate::environment::Environment;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(1)])
        .split(area);

    let title = Paragraph::new(format!("CONTADESK v{}", env!("CARGO_PKG_VERSION")))
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let env_color = match state.environment {
        Environment::Production => Color::Green,
        Environment::Local => Color::LightBlue,
        Environment::Custom { .. } => Color::Yellow,
    };
    let mut spans = vec![
        Span::styled(
            state.session.username.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", state.session.rol),
            Style::default().fg(Color::LightBlue),
        ),
    ];
    if let Some(detail) = &state.session.detail {
        spans.push(Span::styled(
            format!("  {}", detail),
            Style::default().fg(Color::Gray),
        ));
    }
    spans.push(Span::styled(
        format!("  [{}]", state.environment),
        Style::default().fg(env_color),
    ));
    let session = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(session, header_chunks[1]);
}
