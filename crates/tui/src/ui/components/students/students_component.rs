use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use mims_types::{Effect, ModalRequest, Msg, Severity, Student, TableId};
use ratatui::{Frame, layout::Rect, text::Span};

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
const STATUS_OPTIONS: [&str; 2] = ["active", "inactive"];

/// Students screen: the shared data table plus student-specific actions
/// (status/branch filter cycling and delete-behind-confirm).
#[derive(Debug)]
pub struct StudentsComponent {
    table: DataTableComponent,
}

impl Default for StudentsComponent {
    fn default() -> Self {
        Self {
            table: DataTableComponent::new(TableId::Students),
        }
    }
}

/// Table state for the students list, wired to its endpoint and columns.
pub fn students_table_state() -> DataTableState {
    DataTableState::new(
        TableId::Students,
        "students",
        "/api/students/",
        "Students",
        vec![
            Column {
                key: "admission_number",
                label: "Admission #",
                sortable: true,
                render: |row| str_cell(row, "admission_number"),
            },
            Column {
                key: "name",
                label: "Name",
                sortable: true,
                render: |row| str_cell(row, "name"),
            },
            Column {
                key: "class_name",
                label: "Class",
                sortable: false,
                render: |row| str_cell(row, "class_name"),
            },
            Column {
                key: "branch_name",
                label: "Branch",
                sortable: false,
                render: |row| str_cell(row, "branch_name"),
            },
            Column {
                key: "status",
                label: "Status",
                sortable: true,
                render: |row| str_cell(row, "status"),
            },
            Column {
                key: "parent_mobile",
                label: "Parent mobile",
                sortable: false,
                render: |row| str_cell(row, "parent_mobile"),
            },
        ],
    )
}

impl StudentsComponent {
    fn delete_selected(&self, app: &App) -> Vec<Effect> {
        let Some(student) = app
            .table(TableId::Students)
            .selected_row()
            .and_then(Student::from_row)
        else {
            return vec![Effect::Toast(Severity::Warning, "No student selected".into())];
        };

        let submit = Effect::SubmitAction {
            path: format!("/api/students/{}/delete/", student.id),
            body: None,
            refresh: Some(TableId::Students),
        };
        let request = ModalRequest::confirm(
            "Delete student",
            format!("Delete {}? This cannot be undone.", student.display_name()),
            submit,
        )
        .with_severity(Severity::Error);
        vec![Effect::ShowModal(request)]
    }

    fn cycle_branch_filter(&self, app: &mut App) -> Vec<Effect> {
        if app.branches.is_empty() {
            return vec![Effect::LoadBranches];
        }
        let names: Vec<String> = app.branches.iter().map(|branch| branch.name.clone()).collect();
        let options: Vec<&str> = names.iter().map(String::as_str).collect();
        app.table_mut(TableId::Students).cycle_filter("branch", &options);
        vec![Effect::ReloadTable(TableId::Students)]
    }
}

impl Component for StudentsComponent {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        self.table.handle_message(app, msg)
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let search_active = app.table(TableId::Students).search_f.get();
        if !search_active {
            match key.code {
                KeyCode::Char('f') => {
                    app.table_mut(TableId::Students).cycle_filter("status", &STATUS_OPTIONS);
                    return vec![Effect::ReloadTable(TableId::Students)];
                }
                KeyCode::Char('b') => return self.cycle_branch_filter(app),
                KeyCode::Char('d') | KeyCode::Delete => return self.delete_selected(app),
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
        if !app.table(TableId::Students).search_f.get() {
            spans.extend(th::hint_spans(
                &*app.ctx.theme,
                &[("  f", " status  "), ("b", " branch  "), ("d", " delete")],
            ));
        }
        spans
    }

    fn on_route_enter(&mut self, app: &mut App) -> Vec<Effect> {
        let mut effects = self.table.on_route_enter(app);
        if app.branches.is_empty() {
            effects.push(Effect::LoadBranches);
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn students_columns_match_the_list_payload() {
        let state = students_table_state();
        let row = json!({
            "id": 1,
            "admission_number": "ADM-001",
            "name": "Fatima Z",
            "class_name": "Class 2",
            "branch_name": "Main",
            "status": "ACTIVE",
            "parent_mobile": "555-0101"
        });
        let rendered: Vec<String> = state.columns.iter().map(|c| (c.render)(&row)).collect();
        assert_eq!(rendered, vec!["ADM-001", "Fatima Z", "Class 2", "Main", "ACTIVE", "555-0101"]);
    }

    #[test]
    fn sortable_columns_are_the_server_backed_ones() {
        let state = students_table_state();
        let sortable: Vec<&str> = state
            .columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key)
            .collect();
        assert_eq!(sortable, vec!["admission_number", "name", "status"]);
    }
}
