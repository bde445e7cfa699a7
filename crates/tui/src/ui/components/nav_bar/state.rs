use mims_types::Route;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// A single tab in the top navigation bar.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

/// State for the horizontal navigation bar.
#[derive(Debug)]
pub struct NavBarState {
    pub items: Vec<NavItem>,
    /// Index of the tab matching the active route.
    pub selected_index: usize,
    pub container_focus: FocusFlag,
    pub item_focus_flags: Vec<FocusFlag>,
    /// Layout captured during render for mouse hit-testing.
    pub last_area: Rect,
    pub per_item_areas: Vec<Rect>,
}

impl NavBarState {
    pub fn new(items: Vec<NavItem>) -> Self {
        let item_focus_flags = items
            .iter()
            .map(|item| FocusFlag::named(&format!("nav.{}", item.label.to_ascii_lowercase())))
            .collect();
        Self {
            items,
            selected_index: 0,
            container_focus: FocusFlag::named("nav"),
            item_focus_flags,
            last_area: Rect::default(),
            per_item_areas: Vec::new(),
        }
    }

    /// Move child focus one tab forward or backward, wrapping at the ends.
    /// Returns the flag that should receive focus.
    pub fn cycle_focus(&self, forward: bool) -> Option<FocusFlag> {
        if self.item_focus_flags.is_empty() {
            return None;
        }
        let len = self.item_focus_flags.len();
        let current = self.item_focus_flags.iter().position(|flag| flag.get());
        let next = match current {
            None => 0,
            Some(idx) if forward => (idx + 1) % len,
            Some(idx) => (idx + len - 1) % len,
        };
        self.item_focus_flags.get(next).cloned()
    }

    pub fn get_focused_item(&self) -> Option<(&NavItem, usize)> {
        let idx = self.item_focus_flags.iter().position(|flag| flag.get())?;
        self.items.get(idx).map(|item| (item, idx))
    }

    /// Keep the selected tab in step with the active route.
    pub fn sync_selected(&mut self, route: Route) {
        if let Some(idx) = self.items.iter().position(|item| item.route == route) {
            self.selected_index = idx;
        }
    }
}

impl Default for NavBarState {
    fn default() -> Self {
        Self::new(vec![
            NavItem {
                label: "Dashboard",
                route: Route::Dashboard,
            },
            NavItem {
                label: "Students",
                route: Route::Students,
            },
            NavItem {
                label: "Registrations",
                route: Route::Registrations,
            },
        ])
    }
}

impl HasFocus for NavBarState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        self.item_focus_flags.iter().for_each(|flag| {
            builder.leaf_widget(flag);
        });
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        self.last_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_focus_wraps_both_directions() {
        let state = NavBarState::default();
        state.item_focus_flags[2].set(true);
        let next = state.cycle_focus(true).unwrap();
        assert_eq!(next.widget_id(), state.item_focus_flags[0].widget_id());

        state.item_focus_flags[2].set(false);
        state.item_focus_flags[0].set(true);
        let prev = state.cycle_focus(false).unwrap();
        assert_eq!(prev.widget_id(), state.item_focus_flags[2].widget_id());
    }

    #[test]
    fn sync_selected_follows_route() {
        let mut state = NavBarState::default();
        state.sync_selected(Route::Registrations);
        assert_eq!(state.selected_index, 2);
        state.sync_selected(Route::Dashboard);
        assert_eq!(state.selected_index, 0);
    }
}
