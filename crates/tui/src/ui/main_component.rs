//! Top-level view composition: nav bar, the active screen, the hint bar,
//! the shared modal overlay, and the toast stack.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use mims_types::{Effect, ModalRequest, Msg, Route};
use rat_focus::FocusBuilder;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};
use std::rc::Rc;

use crate::app::App;
use crate::ui::components::{
    Component, DashboardComponent, NavBarComponent, RegistrationsComponent, StudentsComponent,
    common::{ModalComponent, ModalState},
    toast::render_toasts,
};
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::centered_fixed_rect;

pub struct MainView {
    /// Component for the active route.
    pub content_view: Option<Box<dyn Component>>,
    pub nav_bar_view: NavBarComponent,
    /// Renderer for the shared modal slot, present while a modal is open.
    pub modal_view: Option<ModalComponent>,

    /// widget_id of the focus just before a modal opened, restored on close.
    transient_focus_id: Option<usize>,
}

impl MainView {
    pub fn new() -> Self {
        Self {
            content_view: Some(Box::new(DashboardComponent)),
            nav_bar_view: NavBarComponent,
            modal_view: None,
            transient_focus_id: None,
        }
    }

    /// Swap the active screen. Not called directly by components; use
    /// `Effect::SwitchTo` so the runtime can bracket it with the route
    /// enter/exit hooks.
    pub fn set_current_route(&mut self, app: &mut App, route: Route) {
        let view: Box<dyn Component> = match route {
            Route::Dashboard => Box::new(DashboardComponent),
            Route::Students => Box::new(StudentsComponent::default()),
            Route::Registrations => Box::new(RegistrationsComponent::default()),
        };
        app.set_route(route);
        self.content_view = Some(view);

        app.focus = Rc::new(FocusBuilder::build_for(app));
        match route {
            Route::Dashboard => app.focus.focus(&app.dashboard),
            Route::Students => app.focus.focus(&app.students),
            Route::Registrations => app.focus.focus(&app.registrations),
        }
    }

    /// Open or close the shared modal (use `None` to clear).
    pub fn set_open_modal(&mut self, app: &mut App, request: Option<ModalRequest>) {
        if let Some(request) = request {
            // Remember where focus was so closing can return there.
            self.transient_focus_id = app.focus.focused().map(|flag| flag.widget_id());
            app.modal = Some(ModalState::from_request(request));
            self.modal_view = Some(ModalComponent::default());
            app.focus = Rc::new(FocusBuilder::build_for(app));
            app.focus.first();
        } else {
            app.modal = None;
            self.modal_view = None;
            app.focus = Rc::new(FocusBuilder::build_for(app));
            self.restore_focus(app);
        }
    }

    pub fn restore_focus(&mut self, app: &mut App) {
        if let Some(id) = self.transient_focus_id.take()
            && app.modal.is_none()
        {
            app.focus.by_widget_id(id);
        } else {
            app.focus.first();
        }
    }
}

impl Component for MainView {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        let mut effects = app.update(msg);
        // Messages go to the topmost interactive layer only.
        if let Some(modal) = self.modal_view.as_mut() {
            effects.extend(modal.handle_message(app, msg));
        } else if let Some(content) = self.content_view.as_mut() {
            effects.extend(content.handle_message(app, msg));
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if let Some(modal) = self.modal_view.as_mut() {
            return modal.handle_key_events(app, key);
        }

        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus.prev();
                return Vec::new();
            }
            _ => {}
        }

        if !app.search_active() {
            match key.code {
                KeyCode::Char('1') => return vec![Effect::SwitchTo(Route::Dashboard)],
                KeyCode::Char('2') => return vec![Effect::SwitchTo(Route::Students)],
                KeyCode::Char('3') => return vec![Effect::SwitchTo(Route::Registrations)],
                KeyCode::Char('q') => return vec![Effect::Quit],
                _ => {}
            }
        }

        if app.nav_bar.container_focus.get() {
            return self.nav_bar_view.handle_key_events(app, key);
        }

        if let Some(content) = self.content_view.as_mut() {
            return content.handle_key_events(app, key);
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some(modal) = self.modal_view.as_mut() {
            return modal.handle_mouse_events(app, mouse);
        }
        let mut effects = self.nav_bar_view.handle_mouse_events(app, mouse);
        if let Some(content) = self.content_view.as_mut() {
            effects.extend(content.handle_mouse_events(app, mouse));
        }
        effects
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        frame.render_widget(
            Block::default().style(Style::default().bg(app.ctx.theme.roles().background)),
            area,
        );

        let chunks = Layout::vertical([
            Constraint::Length(3), // Nav bar
            Constraint::Min(1),    // Active screen
            Constraint::Length(1), // Hint bar
        ])
        .split(area);

        self.nav_bar_view.render(frame, chunks[0], app);
        if let Some(content) = self.content_view.as_mut() {
            content.render(frame, chunks[1], app);
        }

        let hints = Paragraph::new(Line::from(self.get_hint_spans(app))).style(app.ctx.theme.muted_style());
        frame.render_widget(hints, chunks[2]);

        if let Some(modal_view) = self.modal_view.as_mut()
            && let Some(modal) = app.modal.as_ref()
        {
            frame.render_widget(
                Block::default().style(app.ctx.theme.overlay_style()),
                area,
            );
            let dialog = centered_fixed_rect(modal.dialog_width(area.width), modal.dialog_height(area.height), area);
            frame.render_widget(Clear, dialog);
            modal_view.render(frame, dialog, app);
        }

        render_toasts(frame, area, &app.toasts, &*app.ctx.theme);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let mut spans = vec![Span::styled("Hints: ", app.ctx.theme.muted_style())];

        if let Some(modal) = self.modal_view.as_ref() {
            spans.extend(modal.get_hint_spans(app));
            return spans;
        }

        if app.nav_bar.container_focus.get() {
            spans.extend(self.nav_bar_view.get_hint_spans(app));
            return spans;
        }

        if let Some(content) = self.content_view.as_ref() {
            spans.extend(content.get_hint_spans(app));
        }
        if !app.search_active() {
            spans.extend(th::hint_spans(
                &*app.ctx.theme,
                &[("  1-3", " screens  "), ("Tab", " focus  "), ("q", " quit")],
            ));
        }
        spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mims_api::ApiClient;

    fn test_app() -> App {
        let client = ApiClient::with_base(Some("http://localhost:8000")).unwrap();
        App::new(client)
    }

    #[test]
    fn second_modal_request_replaces_the_first() {
        let mut app = test_app();
        let mut view = MainView::new();

        view.set_open_modal(&mut app, Some(ModalRequest::info("First", "one")));
        view.set_open_modal(&mut app, Some(ModalRequest::info("Second", "two")));

        let modal = app.modal.as_ref().unwrap();
        assert_eq!(modal.title(), "Second");
        assert_eq!(modal.focused_button(), Some(0));

        view.set_open_modal(&mut app, None);
        assert!(app.modal.is_none());
        assert!(view.modal_view.is_none());
    }
}
