//! The `Component` trait every view in the client implements.

use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use mims_types::{Effect, Msg};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::App;

/// A view with its own input handling and rendering.
///
/// Components do not mutate global state directly: input and messages reduce
/// into the state they own on [`App`], and anything further (requests, route
/// changes, toasts) is returned as `Effect`s for the runtime to execute.
/// Rendering draws into a caller-provided `Rect` and may record hit-test
/// areas for later mouse events, but has no other side effects.
///
/// Screens additionally get the `on_route_enter`/`on_route_exit` pair, which
/// brackets the time their route is active; the enter hook is where a screen
/// issues its initial load.
pub(crate) trait Component {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// React to a runtime message (tick, resize, completed execution).
    fn handle_message(&mut self, _app: &mut App, _msg: &Msg) -> Vec<Effect> {
        Vec::new()
    }

    /// React to a key event. Only called while the component is the active
    /// input target.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Hotkey hints for the bottom bar while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'_>> {
        Vec::new()
    }

    /// The component's route just became active. Returned effects run
    /// immediately, so initial loads go here.
    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }

    fn on_route_exit(&mut self, _app: &mut App) -> Vec<Effect> {
        Vec::new()
    }
}
