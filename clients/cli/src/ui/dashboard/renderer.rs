//! Dashboard main renderer

use super::components::{cards, footer, header, logs, modal, sidebar, table};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let view = state.screen.view();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Percentage(22),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Fill(1)])
        .split(main_chunks[1]);

    sidebar::render_sidebar(f, content_chunks[0], state);

    let cards_height = if view.cards.is_empty() { 0 } else { 4 };
    let module_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(cards_height),
            Constraint::Fill(1),
        ])
        .split(content_chunks[1]);

    let mut title_spans = vec![Span::styled(
        view.title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(subtitle) = &view.subtitle {
        title_spans.push(Span::styled(
            format!("  {}", subtitle),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(banner) = &view.banner {
        title_spans.push(Span::styled(
            format!("  ⚠ {}", banner),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(title_spans)).alignment(Alignment::Left),
        module_chunks[0],
    );

    cards::render_cards(f, module_chunks[1], &view.cards);
    if let Some(table_view) = &view.table {
        table::render_table(f, module_chunks[2], view.title, table_view);
    }

    logs::render_logs_panel(f, main_chunks[2], state);
    footer::render_footer(f, main_chunks[3], &view);

    if let Some(modal_view) = &view.modal {
        modal::render_modal(f, f.area(), modal_view);
    } else if let Some(question) = &view.confirm {
        modal::render_confirm(f, f.area(), question);
    }
}
