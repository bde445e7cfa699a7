use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use mims_types::{Effect, ModalRequest, Msg, PendingRegistration, Severity, TableId};
use ratatui::{Frame, layout::Rect, text::Span};
use serde_json::{Value, json};

use crate::{
    app::App,
    ui::{
        components::{
            component::Component,
            data_table::{Column, DataTableComponent, DataTableState, str_cell},
        },
        theme::theme_helpers as th,
    },
};

/// Filter values cycled by the status key.
const STATUS_OPTIONS: [&str; 3] = ["pending", "approved", "rejected"];

/// Text sent with a reject action. The review notes live on the web side;
/// the terminal client sends a fixed reason so the parent still gets a
/// notification with context.
const REJECT_REASON: &str = "Rejected after review by the admissions office.";

/// Text sent with a request-info action.
const REQUEST_INFO_MESSAGE: &str =
    "Please provide complete admission documents to continue processing.";

/// Pending registrations screen: the shared data table plus the review
/// actions (approve, reject, request info), each behind a confirm modal.
#[derive(Debug)]
pub struct RegistrationsComponent {
    table: DataTableComponent,
}

impl Default for RegistrationsComponent {
    fn default() -> Self {
        Self {
            table: DataTableComponent::new(TableId::Registrations),
        }
    }
}

/// Table state for the pending registrations list.
pub fn registrations_table_state() -> DataTableState {
    DataTableState::new(
        TableId::Registrations,
        "registrations",
        "/api/pending/students/",
        "Pending Registrations",
        vec![
            Column {
                key: "student_name",
                label: "Name",
                sortable: true,
                render: |row| str_cell(row, "student_name"),
            },
            Column {
                key: "class_name",
                label: "Class",
                sortable: false,
                render: |row| str_cell(row, "class_name"),
            },
            Column {
                key: "interested_branch_name",
                label: "Branch",
                sortable: false,
                render: |row| str_cell(row, "interested_branch_name"),
            },
            Column {
                key: "parent_mobile",
                label: "Parent mobile",
                sortable: false,
                render: |row| str_cell(row, "parent_mobile"),
            },
            Column {
                key: "status",
                label: "Status",
                sortable: true,
                render: |row| str_cell(row, "status"),
            },
            Column {
                key: "submission_date",
                label: "Submitted",
                sortable: true,
                // The endpoint sends full timestamps; the date part is enough here.
                render: |row| str_cell(row, "submission_date").chars().take(10).collect(),
            },
        ],
    )
    .with_empty_message("No pending registrations found")
}

impl RegistrationsComponent {
    fn selected_registration(&self, app: &App) -> Option<PendingRegistration> {
        app.table(TableId::Registrations)
            .selected_row()
            .and_then(PendingRegistration::from_row)
    }

    fn review_action(
        &self,
        app: &App,
        action: &str,
        title: &str,
        prompt: &str,
        severity: Severity,
        body: Option<Value>,
    ) -> Vec<Effect> {
        let Some(registration) = self.selected_registration(app) else {
            return vec![Effect::Toast(Severity::Warning, "No registration selected".into())];
        };

        let submit = Effect::SubmitAction {
            path: format!("/api/pending/students/{}/{action}/", registration.id),
            body,
            refresh: Some(TableId::Registrations),
        };
        let request = ModalRequest::confirm(
            title,
            format!("{prompt} {}?", registration.display_name()),
            submit,
        )
        .with_severity(severity);
        vec![Effect::ShowModal(request)]
    }

    fn approve_selected(&self, app: &App) -> Vec<Effect> {
        self.review_action(
            app,
            "approve",
            "Approve registration",
            "Approve and enroll",
            Severity::Success,
            None,
        )
    }

    fn reject_selected(&self, app: &App) -> Vec<Effect> {
        self.review_action(
            app,
            "reject",
            "Reject registration",
            "Reject the registration for",
            Severity::Error,
            Some(json!({ "reason": REJECT_REASON })),
        )
    }

    fn request_info_selected(&self, app: &App) -> Vec<Effect> {
        self.review_action(
            app,
            "request-info",
            "Request information",
            "Ask for more documents from",
            Severity::Info,
            Some(json!({ "message": REQUEST_INFO_MESSAGE })),
        )
    }
}

impl Component for RegistrationsComponent {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        self.table.handle_message(app, msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let search_active = app.table(TableId::Registrations).search_f.get();
        if !search_active {
            match key.code {
                KeyCode::Char('f') => {
                    app.table_mut(TableId::Registrations)
                        .cycle_filter("status", &STATUS_OPTIONS);
                    return vec![Effect::ReloadTable(TableId::Registrations)];
                }
                KeyCode::Char('a') => return self.approve_selected(app),
                KeyCode::Char('x') => return self.reject_selected(app),
                KeyCode::Char('i') => return self.request_info_selected(app),
                _ => {}
            }
        }
        self.table.handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        self.table.handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        self.table.render(frame, rect, app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut spans = self.table.get_hint_spans(app);
        if !app.table(TableId::Registrations).search_f.get() {
            spans.extend(th::hint_spans(
                &*app.ctx.theme,
                &[
                    ("  f", " status  "),
                    ("a", " approve  "),
                    ("x", " reject  "),
                    ("i", " request info"),
                ],
            ));
        }
        spans
    }

    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        self.table.on_route_enter(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_column_keeps_the_date_part_only() {
        let state = registrations_table_state();
        let row = serde_json::json!({
            "id": 7,
            "student_name": "Bilal K",
            "submission_date": "2026-03-14T09:30:00Z"
        });
        let submitted = state
            .columns
            .iter()
            .find(|c| c.key == "submission_date")
            .map(|c| (c.render)(&row));
        assert_eq!(submitted.as_deref(), Some("2026-03-14"));
    }

    #[test]
    fn sortable_columns_are_the_server_backed_ones() {
        let state = registrations_table_state();
        let sortable: Vec<&str> = state
            .columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key)
            .collect();
        assert_eq!(sortable, vec!["student_name", "status", "submission_date"]);
    }
}
