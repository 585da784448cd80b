//! Dashboard table component
//!
//! Renders the mounted module's current page, tabs and search box

use super::super::utils::truncate;
use crate::resources::SortOrder;
use crate::ui::screen::TableView;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

pub fn render_table(
    f: &mut Frame,
    area: ratatui::layout::Rect,
    title: &str,
    view: &TableView,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Fill(1)])
        .split(area);

    render_toolbar(f, chunks[0], view);

    let width = (chunks[1].width.saturating_sub(2) as usize / view.columns.len().max(1)).max(4);
    let header = Row::new(view.columns.iter().map(|c| {
        Cell::from(*c).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = view.rows.iter().map(|cells| {
        Row::new(
            cells
                .iter()
                .map(|cell| Cell::from(truncate(cell, width.saturating_sub(1)))),
        )
    });

    let arrow = match view.order {
        SortOrder::Asc => "↑",
        SortOrder::Desc => "↓",
    };
    let status = if view.loading {
        "cargando…".to_string()
    } else {
        format!(
            "{} registros · página {}/{} · {}",
            view.total, view.page, view.page_count, arrow
        )
    };

    let table = Table::new(
        rows,
        vec![Constraint::Ratio(1, view.columns.len().max(1) as u32); view.columns.len()],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ")
    .block(
        Block::default()
            .title(title.to_uppercase())
            .title_bottom(status)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    let mut state = TableState::default().with_selected(view.selected);
    f.render_stateful_widget(table, chunks[1], &mut state);

    if view.rows.is_empty() && !view.loading {
        let empty = Paragraph::new("Sin registros").style(Style::default().fg(Color::DarkGray));
        let inner = chunks[1].inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: 2,
        });
        f.render_widget(empty, inner);
    }
}

fn render_toolbar(f: &mut Frame, area: ratatui::layout::Rect, view: &TableView) {
    let mut spans = Vec::new();
    if !view.tabs.is_empty() {
        let labels = std::iter::once("TODOS").chain(view.tabs.iter().copied());
        for (i, label) in labels.enumerate() {
            let style = if i == view.active_tab {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightBlue)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", label), style));
            spans.push(Span::raw(" "));
        }
    }
    let search_style = if view.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if view.searching { "▏" } else { "" };
    spans.push(Span::styled(
        format!("  Buscar: {}{}", view.search, cursor),
        search_style,
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
