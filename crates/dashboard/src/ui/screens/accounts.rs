use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};
use reporting::{NormalizedRecord, ReportKind};

use crate::{
    app::{AppState, InputMode},
    ui::{components::card::Card, theme::Theme},
    view_model::AccountsView,
};

pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &AccountsView,
    theme: &Theme,
) {
    let Some(kind) = state.section.kind() else {
        return;
    };
    let records = reporting::filter(view.records(kind), &state.query);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    render_search(frame, layout[0], state, records.len(), view.records(kind).len(), theme);

    let title = format!("{} ({})", state.section.label(), records.len());
    let block = Card::new(&title, theme)
        .focused(state.mode == InputMode::Normal)
        .block();

    if records.is_empty() {
        let message = if state.query.is_empty() {
            "No accounts in this partition."
        } else {
            "No accounts match the search."
        };
        let empty = Paragraph::new(Span::styled(message, Style::default().fg(theme.dim)))
            .block(block);
        frame.render_widget(empty, layout[1]);
        return;
    }

    let header = Row::new(columns(kind).iter().map(|c| Cell::from(*c)))
        .style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
    let rows = records.iter().map(|record| {
        let status_style = if record.is_active() {
            Style::default().fg(theme.positive)
        } else {
            Style::default().fg(theme.warning)
        };
        let mut cells = vec![
            Cell::from(record.name.clone()),
            Cell::from(record.email.clone()),
            Cell::from(record.contact.clone()),
        ];
        if kind == ReportKind::Providers {
            cells.push(Cell::from(record.business_name.clone()));
        }
        cells.push(Cell::from(location(record)));
        cells.push(Cell::from(record.status.clone()).style(status_style));
        cells.push(Cell::from(record.joined.clone()));
        Row::new(cells).style(Style::default().fg(theme.text))
    });

    let table = Table::new(rows, widths(kind))
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, layout[1], &mut table_state);
}

fn render_search(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    shown: usize,
    total: usize,
    theme: &Theme,
) {
    let mut spans = vec![Span::styled(" Search: ", Style::default().fg(theme.text_muted))];
    match state.mode {
        InputMode::Search => {
            spans.push(Span::styled(
                format!("{}_", state.query),
                Style::default().fg(theme.accent),
            ));
        }
        InputMode::Normal if state.query.is_empty() => {
            spans.push(Span::styled(
                "press / to filter by name or email",
                Style::default().fg(theme.dim),
            ));
        }
        InputMode::Normal => {
            spans.push(Span::styled(
                state.query.clone(),
                Style::default().fg(theme.text),
            ));
        }
    }
    if shown != total {
        spans.push(Span::styled(
            format!("  ({shown} of {total})"),
            Style::default().fg(theme.dim),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn location(record: &NormalizedRecord) -> String {
    format!("{}, {}", record.city, record.state)
}

fn columns(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::Users => &["Name", "Email", "Contact", "Location", "Status", "Joined"],
        ReportKind::Providers => &[
            "Name", "Email", "Contact", "Business", "Location", "Status", "Joined",
        ],
    }
}

fn widths(kind: ReportKind) -> Vec<Constraint> {
    let mut widths = vec![
        Constraint::Percentage(18),
        Constraint::Percentage(24),
        Constraint::Length(14),
    ];
    if kind == ReportKind::Providers {
        widths.push(Constraint::Percentage(16));
    }
    widths.extend([
        Constraint::Percentage(16),
        Constraint::Length(9),
        Constraint::Length(13),
    ]);
    widths
}
