use mims_types::{Effect, ModalButton, ModalRequest, ModalSize, Severity};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// Materialized state for the single shared modal slot.
///
/// A new request replaces this state wholesale; there is no stacking.
#[derive(Debug, Clone)]
pub struct ModalState {
    title: String,
    message: String,
    severity: Severity,
    size: ModalSize,
    dismissible: bool,
    buttons: Vec<(ModalButton, FocusFlag)>,

    container_focus: FocusFlag,
    /// Last rendered dialog area, used for backdrop hit-testing.
    pub area: Rect,
}

impl ModalState {
    pub fn from_request(request: ModalRequest) -> Self {
        let buttons = request
            .buttons
            .into_iter()
            .enumerate()
            .map(|(index, button)| {
                let flag = FocusFlag::named(&format!("modal.button.{index}"));
                (button, flag)
            })
            .collect();
        Self {
            title: request.title,
            message: request.message,
            severity: request.severity,
            size: request.size,
            dismissible: request.dismissible,
            buttons,
            container_focus: FocusFlag::named("modal"),
            area: Rect::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn dismissible(&self) -> bool {
        self.dismissible
    }

    pub fn buttons(&self) -> &[(ModalButton, FocusFlag)] {
        &self.buttons
    }

    pub fn is_button_focused(&self, idx: usize) -> bool {
        self.buttons.get(idx).is_some_and(|(_, flag)| flag.get())
    }

    /// Effect of the button at `idx`, if it carries one.
    pub fn button_effect(&self, idx: usize) -> Option<Effect> {
        self.buttons
            .get(idx)
            .and_then(|(button, _)| button.effect.as_deref().cloned())
    }

    /// Index of the currently focused button.
    pub fn focused_button(&self) -> Option<usize> {
        self.buttons.iter().position(|(_, flag)| flag.get())
    }

    /// Dialog width for the configured size hint, clamped to the frame.
    pub fn dialog_width(&self, frame_width: u16) -> u16 {
        let preferred = match self.size {
            ModalSize::Sm => 40,
            ModalSize::Md => 56,
            ModalSize::Lg => 72,
            ModalSize::Xl => 90,
        };
        preferred.min(frame_width.saturating_sub(4))
    }

    /// Dialog height: message lines plus chrome (borders, spacer, buttons).
    pub fn dialog_height(&self, frame_height: u16) -> u16 {
        let message_lines = self.message.lines().count().max(1) as u16;
        (message_lines + 7).min(frame_height.saturating_sub(2))
    }
}

impl HasFocus for ModalState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        self.buttons.iter().for_each(|(_, flag)| {
            builder.leaf_widget(flag);
        });
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_request_materializes_cancel_and_confirm() {
        let state = ModalState::from_request(ModalRequest::confirm(
            "Delete student",
            "Delete Ahmed Khan?",
            Effect::Quit,
        ));
        assert_eq!(state.buttons().len(), 2);
        assert_eq!(state.buttons()[0].0.label, "Cancel");
        assert_eq!(state.button_effect(0), None);
        assert_eq!(state.button_effect(1), Some(Effect::Quit));
        assert!(state.dismissible());
        assert_eq!(state.severity(), Severity::Warning);
    }

    #[test]
    fn info_request_defaults_to_single_close_button() {
        let state = ModalState::from_request(ModalRequest::info("About", "MIMS terminal client"));
        assert_eq!(state.buttons().len(), 1);
        assert_eq!(state.buttons()[0].0.label, "Close");
        assert_eq!(state.button_effect(0), None);
    }

    #[test]
    fn dialog_width_clamps_to_frame() {
        let state = ModalState::from_request(ModalRequest::info("About", "x").with_size(ModalSize::Xl));
        assert_eq!(state.dialog_width(200), 90);
        assert_eq!(state.dialog_width(60), 56);
    }
}
