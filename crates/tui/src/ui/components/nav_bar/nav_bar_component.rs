use super::NavBarState;
use crate::ui::components::{Component, find_target_index_by_mouse_position};
use crate::{
    app::App,
    ui::theme::theme_helpers::{self as th, ButtonRenderOptions, render_button},
};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use mims_types::Effect;
use ratatui::text::Span;
use ratatui::{Frame, layout::Rect, widgets::Borders};

/// Tab bar across the top of the screen, one tab per route.
///
/// The bar only reports `Effect::SwitchTo`; the main view performs the
/// actual route change so enter/exit hooks run in order.
#[derive(Debug, Default)]
pub struct NavBarComponent;

impl NavBarComponent {
    /// One rect per tab, sized to its label, laid out left to right inside
    /// the bar's border.
    fn tab_rects(&self, state: &NavBarState, area: Rect) -> Vec<Rect> {
        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: 1,
        };
        let mut x = inner.x;
        let mut rects = Vec::with_capacity(state.items.len());
        for item in &state.items {
            let width = (item.label.len() as u16 + 6).min(inner.right().saturating_sub(x));
            rects.push(Rect::new(x, inner.y, width, 1));
            x += width;
        }
        rects
    }

    fn activate_focused(&self, app: &mut App) -> Vec<Effect> {
        let Some((item, index)) = app.nav_bar.get_focused_item() else {
            return Vec::new();
        };
        let route = item.route;
        app.nav_bar.selected_index = index;
        vec![Effect::SwitchTo(route)]
    }
}

impl Component for NavBarComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        // The container can gain focus with no tab focused yet; focus the
        // container itself so rat-focus descends to the first tab.
        if app.nav_bar.container_focus.get() && app.nav_bar.get_focused_item().is_none() {
            app.focus.focus(&app.nav_bar);
        }

        match key.code {
            KeyCode::Tab => {
                app.focus.next();
            }
            KeyCode::BackTab => {
                app.focus.prev();
            }
            KeyCode::Right | KeyCode::Left => {
                if let Some(flag) = app.nav_bar.cycle_focus(key.code == KeyCode::Right) {
                    app.focus.by_widget_id(flag.widget_id());
                }
            }
            KeyCode::Enter => return self.activate_focused(app),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let Some(index) = find_target_index_by_mouse_position(
            &app.nav_bar.last_area,
            &app.nav_bar.per_item_areas,
            mouse.column,
            mouse.row,
        ) else {
            return Vec::new();
        };

        if let Some(flag) = app.nav_bar.item_focus_flags.get(index) {
            app.focus.focus(flag);
        }
        match app.nav_bar.items.get(index) {
            Some(item) => {
                let route = item.route;
                app.nav_bar.selected_index = index;
                vec![Effect::SwitchTo(route)]
            }
            None => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let any_tab_focused = app.nav_bar.item_focus_flags.iter().any(|flag| flag.get());
        frame.render_widget(th::block(theme, Some("MIMS"), any_tab_focused), area);

        let rects = self.tab_rects(&app.nav_bar, area);
        for (index, (item, rect)) in app.nav_bar.items.iter().zip(&rects).enumerate() {
            let focused = app.nav_bar.item_focus_flags[index].get();
            render_button(
                frame,
                *rect,
                item.label,
                theme,
                ButtonRenderOptions::new(true, focused, index == app.nav_bar.selected_index, Borders::NONE),
            );
        }
        app.nav_bar.last_area = area;
        app.nav_bar.per_item_areas = rects;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        th::hint_spans(&*app.ctx.theme, &[("←/→", " switch tab  "), ("Enter", " open")])
    }
}
