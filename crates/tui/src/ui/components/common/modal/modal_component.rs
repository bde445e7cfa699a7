use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use mims_types::{Effect, Msg};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::prelude::Span;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, severity_block, hint_spans, render_button};

/// Renderer and input handler for the shared modal slot.
///
/// All dialog content lives in [`crate::ui::components::common::modal::ModalState`]
/// on the [`App`]; this component keeps only the hit-test areas it recorded
/// during the last render.
#[derive(Default, Debug, Clone)]
pub struct ModalComponent {
    button_areas: Vec<Rect>,
}

impl ModalComponent {
    fn activation_effects(app: &App, index: usize) -> Vec<Effect> {
        let Some(modal) = app.modal.as_ref() else {
            return Vec::new();
        };
        let mut effects = vec![Effect::CloseModal];
        effects.extend(modal.button_effect(index));
        effects
    }
}

impl Component for ModalComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Enter => {
                if let Some(index) = app.modal.as_ref().and_then(|modal| modal.focused_button()) {
                    return Self::activation_effects(app, index);
                }
            }
            KeyCode::Esc => {
                if app.modal.as_ref().is_some_and(|modal| modal.dismissible()) {
                    return vec![Effect::CloseModal];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(column, row);
        if let Some(index) = self.button_areas.iter().position(|area| area.contains(position)) {
            return Self::activation_effects(app, index);
        }
        // A click on the dimmed backdrop dismisses, when allowed.
        if let Some(modal) = app.modal.as_ref()
            && !modal.area.contains(position)
            && modal.dismissible()
        {
            return vec![Effect::CloseModal];
        }
        Vec::new()
    }

    fn handle_message(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        if let Some(modal) = app.modal.as_mut() {
            modal.area = rect;
        }
        let theme = &*app.ctx.theme;
        let Some(modal) = app.modal.as_ref() else {
            return;
        };

        let block = severity_block(theme, modal.severity(), Some(modal.title()));
        let inner = block.inner(rect);
        frame.render_widget(&block, rect);

        let [message_rect, _, button_rect] = Layout::vertical([
            Constraint::Min(1),    // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Buttons
        ])
        .areas(inner);

        let lines = modal
            .message()
            .lines()
            .map(|line| Line::from(Span::from(line.to_string())))
            .collect::<Vec<Line>>();
        let paragraph = Paragraph::new(lines).block(Block::default()).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, message_rect);

        // Fixed-width buttons laid out left to right with a small gap.
        const BUTTON_WIDTH: u16 = 12;
        const BUTTON_GAP: u16 = 2;
        self.button_areas.clear();
        for (i, (button, _)) in modal.buttons().iter().enumerate() {
            let offset = i as u16 * (BUTTON_WIDTH + BUTTON_GAP);
            let rect = Rect::new(button_rect.x + offset, button_rect.y, BUTTON_WIDTH, button_rect.height);
            render_button(
                frame,
                rect,
                button.label.as_str(),
                theme,
                ButtonRenderOptions::new(true, modal.is_button_focused(i), false, Borders::ALL),
            );
            self.button_areas.push(rect);
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        hint_spans(
            &*app.ctx.theme,
            &[("Tab/Shift+Tab", " focus  "), ("Enter", " confirm  "), ("Esc", " close")],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::common::ModalState;
    use crossterm::event::KeyModifiers;
    use mims_api::ApiClient;
    use mims_types::{ModalRequest, Severity};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn confirm_effect() -> Effect {
        Effect::Toast(Severity::Success, "confirmed".into())
    }

    fn app_with_confirm() -> App {
        let client = ApiClient::with_base(Some("http://localhost:8000")).unwrap();
        let mut app = App::new(client);
        app.modal = Some(ModalState::from_request(ModalRequest::confirm(
            "Delete student",
            "Delete Ahmed Khan?",
            confirm_effect(),
        )));
        app
    }

    #[test]
    fn enter_on_confirm_hides_and_emits_the_effect_once() {
        let mut app = app_with_confirm();
        app.modal.as_ref().unwrap().buttons()[1].1.set(true);

        let effects = ModalComponent::default().handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(effects, vec![Effect::CloseModal, confirm_effect()]);
    }

    #[test]
    fn enter_on_cancel_only_hides() {
        let mut app = app_with_confirm();
        app.modal.as_ref().unwrap().buttons()[0].1.set(true);

        let effects = ModalComponent::default().handle_key_events(&mut app, key(KeyCode::Enter));
        assert_eq!(effects, vec![Effect::CloseModal]);
    }

    #[test]
    fn esc_honors_the_dismissible_flag() {
        let mut app = app_with_confirm();
        let effects = ModalComponent::default().handle_key_events(&mut app, key(KeyCode::Esc));
        assert_eq!(effects, vec![Effect::CloseModal]);

        let mut request = ModalRequest::info("Working", "Please wait");
        request.dismissible = false;
        app.modal = Some(ModalState::from_request(request));
        let effects = ModalComponent::default().handle_key_events(&mut app, key(KeyCode::Esc));
        assert!(effects.is_empty());
    }
}
