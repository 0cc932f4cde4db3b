use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
    view_model::AccountsView,
};

/// Shown until the first snapshot lands, or when it failed to load.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, view: &AccountsView) {
    let theme = Theme::default();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(7),
            Constraint::Min(0),
        ])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(rows[1]);

    let mut lines = vec![Line::from(Span::styled(
        state.base_url.clone(),
        Style::default().fg(theme.dim),
    ))];
    let failed = match (&view.error, view.refreshing) {
        (Some(error), false) => {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.error),
            )));
            lines.push(Line::from(vec![
                Span::raw("press "),
                Span::styled("r", Style::default().fg(theme.accent)),
                Span::raw(" to retry, "),
                Span::styled("q", Style::default().fg(theme.accent)),
                Span::raw(" to quit"),
            ]));
            true
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "Loading accounts…",
                Style::default().fg(theme.text),
            )));
            false
        }
    };

    let block = Card::new("GigFusion Admin", &theme).focused(failed).block();
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, cols[1]);
}
