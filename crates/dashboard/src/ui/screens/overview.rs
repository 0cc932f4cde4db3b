use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    ui::{components::card::StatCard, theme::Theme},
    view_model::AccountsView,
};

pub fn render(frame: &mut Frame<'_>, area: Rect, view: &AccountsView, theme: &Theme) {
    let stats = view.stats();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    let users = halves(rows[0]);
    let providers = halves(rows[1]);

    StatCard::new("Total Users", stats.total_users.to_string(), theme)
        .subtitle("role: user")
        .render(frame, users[0]);
    StatCard::new("Active Users", stats.active_users.to_string(), theme)
        .subtitle(share(stats.active_users, stats.total_users))
        .render(frame, users[1]);
    StatCard::new("Total Providers", stats.total_providers.to_string(), theme)
        .subtitle("role: serviceProvider")
        .render(frame, providers[0]);
    StatCard::new(
        "Active Providers",
        stats.active_providers.to_string(),
        theme,
    )
    .subtitle(share(stats.active_providers, stats.total_providers))
    .render(frame, providers[1]);

    if stats.unclassified > 0 {
        let line = Line::from(vec![
            Span::styled(" ! ", Style::default().fg(theme.warning)),
            Span::styled(
                format!(
                    "{} record(s) with a missing or unknown role were left out",
                    stats.unclassified
                ),
                Style::default().fg(theme.text_muted),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), rows[2]);
    }
}

fn halves(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

fn share(part: usize, total: usize) -> String {
    if total == 0 {
        return "no accounts".to_string();
    }
    format!("{}% of {total}", part * 100 / total)
}
