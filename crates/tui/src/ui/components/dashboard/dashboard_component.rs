use crossterm::event::{KeyCode, KeyEvent};
use mims_types::{DashboardStats, Effect};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::App,
    ui::{
        components::component::Component,
        theme::{roles::Theme, theme_helpers as th},
    },
};

/// Dashboard screen: a grid of stat cards fed by the statistics endpoint.
///
/// Read-only except for the refresh key; all numbers come from one snapshot
/// so the cards never disagree with each other.
#[derive(Debug, Default)]
pub struct DashboardComponent;

struct Card {
    title: &'static str,
    lines: Vec<(String, String)>,
}

fn percentage(value: f64) -> String {
    format!("{value:.1}%")
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn build_cards(stats: &DashboardStats) -> Vec<Card> {
    vec![
        Card {
            title: "Students",
            lines: vec![
                ("Total".into(), stats.students.total.to_string()),
                ("Active".into(), stats.students.active.to_string()),
                ("Inactive".into(), stats.students.inactive.to_string()),
            ],
        },
        Card {
            title: "Staff",
            lines: vec![
                ("Total".into(), stats.staff.total.to_string()),
                ("Active".into(), stats.staff.active.to_string()),
            ],
        },
        Card {
            title: "Registrations",
            lines: vec![
                ("Students".into(), stats.registrations.pending_students.to_string()),
                ("Staff".into(), stats.registrations.pending_staff.to_string()),
                ("Pending".into(), stats.registrations.total_pending.to_string()),
            ],
        },
        Card {
            title: "Fees",
            lines: vec![
                ("This month".into(), money(stats.fees.this_month_collection)),
                ("Pending dues".into(), money(stats.fees.pending_dues)),
                ("With dues".into(), stats.fees.total_students_with_dues.to_string()),
            ],
        },
        Card {
            title: "Attendance",
            lines: vec![
                (
                    "Students".into(),
                    format!(
                        "{}/{} ({})",
                        stats.attendance.students_present,
                        stats.attendance.students_total,
                        percentage(stats.attendance.students_percentage)
                    ),
                ),
                (
                    "Staff".into(),
                    format!(
                        "{}/{} ({})",
                        stats.attendance.staff_present,
                        stats.attendance.staff_total,
                        percentage(stats.attendance.staff_percentage)
                    ),
                ),
            ],
        },
    ]
}

impl DashboardComponent {
    fn render_card(&self, frame: &mut Frame, area: Rect, app: &App, card: &Card) {
        let theme = &*app.ctx.theme;
        let focused = app.dashboard.container_focus.get();
        let block = th::block(theme, Some(card.title), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = card
            .lines
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<14}"), theme.muted_style()),
                    Span::styled(value.clone(), theme.text_style()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for DashboardComponent {
    fn handle_key_events(&mut self, _app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Char('r') => vec![Effect::LoadDashboard],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        app.dashboard.area = rect;
        let theme = &*app.ctx.theme;

        let title = if app.dashboard.loading {
            format!("Overview {}", app.throbber_frame())
        } else {
            "Overview".to_string()
        };
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Length(5), Constraint::Length(5)])
            .margin(1)
            .split(rect);
        frame.render_widget(
            Paragraph::new(Span::styled(title, theme.heading_style())),
            chunks[0],
        );

        let Some(stats) = app.dashboard.stats.clone() else {
            let message = if app.dashboard.loading {
                "Loading statistics..."
            } else {
                "No statistics available. Press r to refresh."
            };
            frame.render_widget(
                Paragraph::new(message).centered().style(theme.muted_style()),
                chunks[1],
            );
            return;
        };

        let cards = build_cards(&stats);
        let top = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(chunks[1]);
        let bottom = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(chunks[2]);
        let areas = top.iter().chain(bottom.iter());
        for (card, area) in cards.iter().zip(areas) {
            self.render_card(frame, *area, app, card);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::hint_spans(&*app.ctx.theme, &[("r", " refresh")])
    }

    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        vec![Effect::LoadDashboard]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_cover_every_stat_group() {
        let cards = build_cards(&DashboardStats::default());
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Students", "Staff", "Registrations", "Fees", "Attendance"]);
    }

    #[test]
    fn money_and_percentage_formatting() {
        assert_eq!(money(1250.5), "1250.50");
        assert_eq!(percentage(87.25), "87.2%");
    }
}
