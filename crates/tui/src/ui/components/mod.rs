//! UI components: nav bar, data table, modal, toasts, and the screens
//! built from them.

pub mod common;
pub mod component;
pub mod dashboard;
pub mod data_table;
pub mod nav_bar;
pub mod registrations;
pub mod students;
pub mod toast;

pub use component::*;
pub use dashboard::DashboardComponent;
pub use data_table::DataTableComponent;
pub use nav_bar::NavBarComponent;
pub use registrations::RegistrationsComponent;
pub use students::StudentsComponent;

use ratatui::layout::{Position, Rect};

/// Hit-test a mouse position against a list of item rects captured at render
/// time. Returns the index of the item under the cursor, or `None` when the
/// cursor is outside `container` entirely.
pub fn find_target_index_by_mouse_position(
    container: &Rect,
    item_areas: &[Rect],
    column: u16,
    row: u16,
) -> Option<usize> {
    let position = Position::new(column, row);
    if !container.contains(position) {
        return None;
    }
    item_areas.iter().position(|area| area.contains(position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_finds_item_under_cursor() {
        let container = Rect::new(0, 0, 30, 3);
        let items = vec![Rect::new(1, 1, 10, 1), Rect::new(12, 1, 10, 1)];
        assert_eq!(find_target_index_by_mouse_position(&container, &items, 13, 1), Some(1));
        assert_eq!(find_target_index_by_mouse_position(&container, &items, 2, 1), Some(0));
    }

    #[test]
    fn hit_test_rejects_points_outside_container() {
        let container = Rect::new(0, 0, 30, 3);
        let items = vec![Rect::new(1, 1, 10, 1)];
        assert_eq!(find_target_index_by_mouse_position(&container, &items, 40, 1), None);
        // Inside the container but between items
        assert_eq!(find_target_index_by_mouse_position(&container, &items, 25, 1), None);
    }
}
