pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, InputMode, Section},
    view_model::{AccountsView, Phase},
};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState, view: &AccountsView) {
    let area = frame.area();
    match view.phase {
        Phase::Loading => screens::loading::render(frame, area, state, view),
        Phase::Ready => render_shell(frame, area, state, view),
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, view: &AccountsView) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, view, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Overview => screens::overview::render(frame, layout[2], view, &theme),
        Section::Users | Section::Providers => {
            screens::accounts::render(frame, layout[2], state, view, &theme)
        }
    }

    render_bottom_bar(frame, layout[3], state, &theme);
}

fn render_info_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    view: &AccountsView,
    theme: &Theme,
) {
    let refresh = view
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if view.refreshing {
        ("Refreshing...", Style::default().fg(theme.warning))
    } else if view.error.is_some() {
        ("ERR", Style::default().fg(theme.error))
    } else {
        ("OK", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = get_context_hints(state, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    if state.mode == InputMode::Normal {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.push(Span::styled("q", Style::default().fg(theme.accent)));
        parts.push(Span::raw(" quit"));
    }

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Returns keyboard hints for the current section and input mode.
fn get_context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    if state.mode == InputMode::Search {
        return vec![
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" keep filter  "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" clear"),
        ];
    }

    match state.section {
        Section::Overview => vec![
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" refresh"),
        ],
        Section::Users | Section::Providers => vec![
            Span::styled("/", Style::default().fg(theme.accent)),
            Span::raw(" search  "),
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" refresh  "),
            Span::styled("e", Style::default().fg(theme.accent)),
            Span::raw(" export xlsx  "),
            Span::styled("c", Style::default().fg(theme.accent)),
            Span::raw(" export csv"),
        ],
    }
}
