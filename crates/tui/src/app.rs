//! Application state for the MIMS terminal client.
//!
//! `App` is the single owner of all UI state: the active route, per-table
//! state, the dashboard snapshot, lookup caches, toasts, and the modal slot.
//! `App::update` is the pure message reducer; side effects are described as
//! `Effect`s and executed by the command layer in [`crate::cmd`].

use std::rc::Rc;
use std::time::Instant;

use mims_api::ApiClient;
use mims_types::{Branch, Effect, ExecOutcome, Msg, Route, Severity, TableId};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::components::{
    common::ModalState,
    dashboard::DashboardState,
    data_table::DataTableState,
    nav_bar::NavBarState,
    registrations::registrations_table_state,
    students::students_table_state,
    toast::{self, Toast},
};
use crate::ui::theme::{self, roles::Theme};

const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Cross-cutting shared context owned by the App.
///
/// Holds runtime-wide objects like the API client and the active theme so
/// components do not need them threaded through individually.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub client: ApiClient,
}

impl std::fmt::Debug for SharedCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedCtx").field("client", &self.client).finish()
    }
}

/// Top-level application state.
pub struct App {
    pub ctx: SharedCtx,
    pub route: Route,

    pub nav_bar: NavBarState,
    pub dashboard: DashboardState,
    pub students: DataTableState,
    pub registrations: DataTableState,

    /// Branch lookup cache, loaded once and shared by the filter cyclers.
    pub branches: Vec<Branch>,
    pub toasts: Vec<Toast>,
    /// The single shared modal slot. `Some` suppresses all other focus.
    pub modal: Option<ModalState>,

    pub focus: Rc<Focus>,
    container_focus: FocusFlag,

    /// True while background requests are in flight; drives the throbber.
    pub executing: bool,
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        Self {
            ctx: SharedCtx {
                theme: theme::load_from_env(),
                client,
            },
            route: Route::Dashboard,
            nav_bar: NavBarState::default(),
            dashboard: DashboardState::default(),
            students: students_table_state(),
            registrations: registrations_table_state(),
            branches: Vec::new(),
            toasts: Vec::new(),
            modal: None,
            focus: Rc::new(Focus::default()),
            container_focus: FocusFlag::named("app"),
            executing: false,
            throbber_idx: 0,
            should_quit: false,
        }
    }

    pub fn table(&self, id: TableId) -> &DataTableState {
        match id {
            TableId::Students => &self.students,
            TableId::Registrations => &self.registrations,
        }
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut DataTableState {
        match id {
            TableId::Students => &mut self.students,
            TableId::Registrations => &mut self.registrations,
        }
    }

    /// Split borrow: the shared context alongside one mutable table. Lets
    /// render paths style from the theme while recording table areas.
    pub fn table_parts(&mut self, id: TableId) -> (&SharedCtx, &mut DataTableState) {
        match id {
            TableId::Students => (&self.ctx, &mut self.students),
            TableId::Registrations => (&self.ctx, &mut self.registrations),
        }
    }

    pub fn throbber_frame(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }

    pub fn push_toast(&mut self, severity: Severity, message: impl Into<String>) {
        self.toasts.push(Toast::new(severity, message));
    }

    /// True while either search box owns the keyboard, which disables the
    /// single-letter global shortcuts.
    pub fn search_active(&self) -> bool {
        self.students.search_f.get() || self.registrations.search_f.get()
    }

    /// Whether anything on screen needs animation ticks.
    pub fn is_animating(&self) -> bool {
        self.executing
            || self.dashboard.loading
            || self.students.loading
            || self.registrations.loading
            || self.students.has_pending_debounce()
            || self.registrations.has_pending_debounce()
            || !self.toasts.is_empty()
    }

    pub fn set_route(&mut self, route: Route) {
        self.route = route;
        self.nav_bar.sync_selected(route);
    }

    /// Reduce a runtime message into state changes. Follow-up work is
    /// returned as effects for the command layer.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.executing || self.dashboard.loading || self.students.loading || self.registrations.loading {
                    self.throbber_idx = self.throbber_idx.wrapping_add(1);
                }
                toast::prune(&mut self.toasts, Instant::now());
                Vec::new()
            }
            Msg::Resize(_, _) => Vec::new(),
            Msg::ExecCompleted(outcome) => self.apply_outcome(outcome),
        }
    }

    fn apply_outcome(&mut self, outcome: &ExecOutcome) -> Vec<Effect> {
        match outcome {
            ExecOutcome::ListLoaded { table, seq, page } => {
                if !self.table_mut(*table).apply_page(*seq, page.clone()) {
                    tracing::debug!(table = ?table, seq, "discarding stale list page");
                }
                Vec::new()
            }
            ExecOutcome::ListFailed { table, seq, message } => {
                if self.table_mut(*table).apply_failure(*seq) {
                    self.push_toast(Severity::Error, message.clone());
                } else {
                    tracing::debug!(table = ?table, seq, "discarding stale list failure");
                }
                Vec::new()
            }
            ExecOutcome::StatsLoaded(stats) => {
                self.dashboard.apply_stats(*stats.clone());
                Vec::new()
            }
            ExecOutcome::StatsFailed(message) => {
                self.dashboard.apply_failure();
                self.push_toast(Severity::Error, message.clone());
                Vec::new()
            }
            ExecOutcome::BranchesLoaded(branches) => {
                self.branches = branches.clone();
                Vec::new()
            }
            ExecOutcome::BranchesFailed(message) => {
                self.push_toast(Severity::Warning, message.clone());
                Vec::new()
            }
            ExecOutcome::ActionCompleted { message, refresh } => {
                self.push_toast(Severity::Success, message.clone());
                match refresh {
                    Some(table) => vec![Effect::ReloadTable(*table)],
                    None => Vec::new(),
                }
            }
            ExecOutcome::ActionFailed(message) => {
                self.push_toast(Severity::Error, message.clone());
                Vec::new()
            }
        }
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        // An open modal owns the whole focus cycle.
        if let Some(modal) = self.modal.as_ref() {
            builder.widget(modal);
            return;
        }
        builder.widget(&self.nav_bar);
        match self.route {
            Route::Dashboard => builder.widget(&self.dashboard),
            Route::Students => builder.widget(&self.students),
            Route::Registrations => builder.widget(&self.registrations),
        };
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mims_types::{DashboardStats, ListPage};
    use serde_json::json;

    fn test_app() -> App {
        let client = ApiClient::with_base(Some("http://localhost:8000")).unwrap();
        App::new(client)
    }

    #[test]
    fn action_completion_toasts_and_requests_refresh() {
        let mut app = test_app();
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ActionCompleted {
            message: "Student deleted".into(),
            refresh: Some(TableId::Students),
        })));
        assert_eq!(effects, vec![Effect::ReloadTable(TableId::Students)]);
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].severity, Severity::Success);
    }

    #[test]
    fn stale_list_outcome_is_ignored() {
        let mut app = test_app();
        let stale = app.students.begin_load();
        let fresh = app.students.begin_load();

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ListLoaded {
            table: TableId::Students,
            seq: stale,
            page: ListPage {
                rows: vec![json!({"id": 1})],
                count: 1,
            },
        })));
        assert!(app.students.rows.is_empty());

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ListLoaded {
            table: TableId::Students,
            seq: fresh,
            page: ListPage {
                rows: vec![json!({"id": 2})],
                count: 1,
            },
        })));
        assert_eq!(app.students.rows.len(), 1);
    }

    #[test]
    fn list_failure_empties_the_table_and_toasts() {
        let mut app = test_app();
        let seq = app.students.begin_load();
        app.students.rows = vec![json!({"id": 1})];
        app.students.count = 1;

        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::ListFailed {
            table: TableId::Students,
            seq,
            message: "500: Internal Server Error".into(),
        })));
        assert!(effects.is_empty());
        assert!(app.students.rows.is_empty());
        assert_eq!(app.students.count, 0);
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].severity, Severity::Error);
    }

    #[test]
    fn stats_failure_keeps_previous_snapshot_but_toasts() {
        let mut app = test_app();
        app.dashboard.apply_stats(DashboardStats::default());
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::StatsFailed(
            "dashboard request failed".into(),
        ))));
        assert!(app.dashboard.stats.is_some());
        assert_eq!(app.toasts.len(), 1);
        assert_eq!(app.toasts[0].severity, Severity::Error);
    }

    #[test]
    fn route_switch_keeps_nav_in_sync() {
        let mut app = test_app();
        app.set_route(Route::Registrations);
        assert_eq!(app.nav_bar.selected_index, 2);
        assert_eq!(app.route, Route::Registrations);
    }

    #[test]
    fn animation_tracks_loading_and_toasts() {
        let mut app = test_app();
        assert!(!app.is_animating());
        app.students.begin_load();
        assert!(app.is_animating());
    }
}
