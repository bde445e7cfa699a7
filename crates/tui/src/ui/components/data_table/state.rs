use std::time::{Duration, Instant};

use indexmap::IndexMap;
use mims_api::{DEFAULT_PAGE_SIZE, ListQuery};
use mims_types::{ListPage, SortOrder, TableId};
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use ratatui::widgets::TableState;
use serde_json::Value;

use crate::ui::components::common::text_input::TextInputState;

/// Quiet period between the last search keystroke and the request it issues.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Maximum number of numbered page links shown in the footer.
pub const PAGE_WINDOW: u64 = 5;

/// Column descriptor for a data table.
///
/// `key` is the wire name sent as `sort_by`; `render` projects an opaque row
/// into display text.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    pub render: fn(&Value) -> String,
}

/// State for one paginated server-backed table.
///
/// Rows are opaque JSON; everything the server controls (ordering, filtering,
/// pagination) is reloaded rather than computed locally. A monotone request
/// sequence guards against out-of-order completions: only the outcome stamped
/// with the latest issued sequence may touch the rows.
#[derive(Debug)]
pub struct DataTableState {
    pub id: TableId,
    pub endpoint: &'static str,
    pub title: &'static str,
    pub columns: Vec<Column>,

    pub rows: Vec<Value>,
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub searchable: bool,
    pub sortable: bool,
    pub empty_message: &'static str,
    pub loading: bool,
    seq: u64,

    pub search: TextInputState,
    debounce_deadline: Option<Instant>,
    pub sort_by: Option<&'static str>,
    pub sort_order: SortOrder,
    pub filters: IndexMap<String, String>,

    pub table_state: TableState,

    // rat-focus flags for the search box, the grid, and the footer nav
    pub container_f: FocusFlag,
    pub search_f: FocusFlag,
    pub grid_f: FocusFlag,
    pub nav_f: FocusFlag,

    /// Last rendered outer area, used for focus bookkeeping.
    pub area: Rect,
}

impl DataTableState {
    pub fn new(id: TableId, name: &str, endpoint: &'static str, title: &'static str, columns: Vec<Column>) -> Self {
        Self {
            id,
            endpoint,
            title,
            columns,
            rows: Vec::new(),
            count: 0,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            searchable: true,
            sortable: true,
            empty_message: "No matching records found",
            loading: false,
            seq: 0,
            search: TextInputState::new(),
            debounce_deadline: None,
            sort_by: None,
            sort_order: SortOrder::default(),
            filters: IndexMap::new(),
            table_state: TableState::default(),
            container_f: FocusFlag::named(name),
            search_f: FocusFlag::named(&format!("{name}.search")),
            grid_f: FocusFlag::named(&format!("{name}.grid")),
            nav_f: FocusFlag::named(&format!("{name}.nav")),
            area: Rect::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Disable the free-text search box and its focus stop.
    pub fn with_searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Disable sorting for the whole table regardless of column flags.
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_empty_message(mut self, message: &'static str) -> Self {
        self.empty_message = message;
        self
    }

    // Selectors

    pub fn total_pages(&self) -> u64 {
        self.count.div_ceil(self.page_size.max(1))
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Numbered page links for the footer: a window of up to [`PAGE_WINDOW`]
    /// pages centered on the current page and clamped to valid pages.
    pub fn page_window(&self) -> Vec<u64> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        let half = PAGE_WINDOW / 2;
        let mut end = (self.page.saturating_add(half)).min(total);
        if end < PAGE_WINDOW {
            end = PAGE_WINDOW.min(total);
        }
        let start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
        (start..=end).collect()
    }

    /// 1-based inclusive range of the rows on the current page, `(0, 0)` when
    /// the result set is empty.
    pub fn showing_range(&self) -> (u64, u64) {
        if self.count == 0 {
            return (0, 0);
        }
        let start = (self.page - 1) * self.page_size + 1;
        let end = (self.page * self.page_size).min(self.count);
        (start, end)
    }

    /// Footer summary line, mirroring the usual admin-panel phrasing.
    pub fn showing_text(&self) -> String {
        let (start, end) = self.showing_range();
        format!("Showing {start} to {end} of {} entries", self.count)
    }

    pub fn selected_row(&self) -> Option<&Value> {
        self.table_state.selected().and_then(|idx| self.rows.get(idx))
    }

    /// Build the query for the current page, search, sort, and filters.
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            page_size: self.page_size,
            search: self.search.input().to_string(),
            sort_by: self.sort_by.map(str::to_string),
            sort_order: self.sort_order,
            filters: self.filters.clone(),
        }
    }

    // Reducers

    /// Stamp a new request. The returned sequence must accompany the
    /// completion for it to be applied.
    pub fn begin_load(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.seq
    }

    /// Apply a loaded page. Returns `false` when the completion is stale and
    /// was discarded.
    pub fn apply_page(&mut self, seq: u64, page: ListPage) -> bool {
        if seq != self.seq {
            return false;
        }
        self.loading = false;
        self.rows = page.rows;
        self.count = page.count;
        let last_page = self.total_pages().max(1);
        self.page = self.page.min(last_page);
        if self.rows.is_empty() {
            self.table_state.select(None);
        } else {
            let idx = self.table_state.selected().unwrap_or(0).min(self.rows.len() - 1);
            self.table_state.select(Some(idx));
        }
        true
    }

    /// Apply a failed load. Stale failures are discarded like stale pages so
    /// a slow error cannot clobber a newer successful page.
    pub fn apply_failure(&mut self, seq: u64) -> bool {
        if seq != self.seq {
            return false;
        }
        self.loading = false;
        self.rows.clear();
        self.count = 0;
        self.table_state.select(None);
        true
    }

    pub fn push_search_char(&mut self, c: char, now: Instant) {
        self.search.insert_char(c);
        self.schedule_search(now);
    }

    pub fn backspace_search(&mut self, now: Instant) {
        self.search.backspace();
        self.schedule_search(now);
    }

    pub fn clear_search(&mut self, now: Instant) {
        if self.search.input().is_empty() {
            return;
        }
        self.search.clear();
        self.schedule_search(now);
    }

    fn schedule_search(&mut self, now: Instant) {
        self.debounce_deadline = Some(now + SEARCH_DEBOUNCE);
        self.page = 1;
    }

    /// Consume an elapsed debounce deadline. Returns `true` exactly once per
    /// deadline, when it has passed.
    pub fn take_due_debounce(&mut self, now: Instant) -> bool {
        match self.debounce_deadline {
            Some(deadline) if deadline <= now => {
                self.debounce_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending debounce, for submits that reload immediately.
    pub fn cancel_debounce(&mut self) {
        self.debounce_deadline = None;
    }

    pub fn has_pending_debounce(&self) -> bool {
        self.debounce_deadline.is_some()
    }

    /// Toggle sort on a column: first activation sorts ascending, repeated
    /// activation flips the order. Resets to the first page.
    pub fn toggle_sort(&mut self, column_index: usize) -> bool {
        if !self.sortable {
            return false;
        }
        let Some(column) = self.columns.get(column_index) else {
            return false;
        };
        if !column.sortable {
            return false;
        }
        if self.sort_by == Some(column.key) {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_by = Some(column.key);
            self.sort_order = SortOrder::Ascending;
        }
        self.page = 1;
        true
    }

    /// Index of the next sortable column after the current sort target,
    /// wrapping around. Used by keyboard-driven sort cycling.
    pub fn next_sortable_column(&self) -> Option<usize> {
        if !self.sortable {
            return None;
        }
        let sortable: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.sortable)
            .map(|(i, _)| i)
            .collect();
        if sortable.is_empty() {
            return None;
        }
        let current = self
            .sort_by
            .and_then(|key| self.columns.iter().position(|c| c.key == key));
        match current {
            None => sortable.first().copied(),
            Some(idx) => sortable
                .iter()
                .find(|&&i| i > idx)
                .or_else(|| sortable.first())
                .copied(),
        }
    }

    /// Replace the whole filter mapping and return to the first page.
    /// Search and sort are left untouched.
    pub fn set_filters(&mut self, filters: IndexMap<String, String>) {
        self.filters = filters;
        self.page = 1;
    }

    /// Set or clear a single filter value. Empty means "all" and removes the
    /// entry. Either way the table returns to the first page; search and
    /// sort are left untouched.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.filters.shift_remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
        self.page = 1;
    }

    /// Advance a filter through `options`, wrapping back to "all" after the
    /// last option. Returns the newly active value, `None` meaning "all".
    pub fn cycle_filter<'a>(&mut self, key: &str, options: &[&'a str]) -> Option<&'a str> {
        let next = match self.filters.get(key) {
            None => options.first().copied(),
            Some(current) => options
                .iter()
                .position(|option| option == current)
                .and_then(|idx| options.get(idx + 1))
                .copied(),
        };
        self.set_filter(key, next.unwrap_or(""));
        next
    }

    pub fn reduce_next_page(&mut self) -> bool {
        if self.has_next_page() {
            self.page += 1;
            return true;
        }
        false
    }

    pub fn reduce_prev_page(&mut self) -> bool {
        if self.has_prev_page() {
            self.page -= 1;
            return true;
        }
        false
    }

    pub fn reduce_first_page(&mut self) -> bool {
        if self.page != 1 {
            self.page = 1;
            return true;
        }
        false
    }

    pub fn reduce_last_page(&mut self) -> bool {
        let last = self.total_pages();
        if last > 0 && self.page != last {
            self.page = last;
            return true;
        }
        false
    }

    pub fn set_page(&mut self, page: u64) -> bool {
        let clamped = page.clamp(1, self.total_pages().max(1));
        if clamped != self.page {
            self.page = clamped;
            return true;
        }
        false
    }

    pub fn select_next_row(&mut self) {
        if self.rows.is_empty() {
            self.table_state.select(None);
            return;
        }
        let idx = self
            .table_state
            .selected()
            .map(|i| (i + 1).min(self.rows.len() - 1))
            .unwrap_or(0);
        self.table_state.select(Some(idx));
    }

    pub fn select_prev_row(&mut self) {
        if self.rows.is_empty() {
            self.table_state.select(None);
            return;
        }
        let idx = self.table_state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.table_state.select(Some(idx));
    }

    pub fn select_first_row(&mut self) {
        self.table_state.select(if self.rows.is_empty() { None } else { Some(0) });
    }

    pub fn select_last_row(&mut self) {
        self.table_state
            .select(self.rows.len().checked_sub(1));
    }
}

impl HasFocus for DataTableState {
    fn build(&self, builder: &mut FocusBuilder) {
        let start = builder.start(self);
        if self.searchable {
            builder.leaf_widget(&self.search_f);
        }
        builder.leaf_widget(&self.grid_f);
        builder.leaf_widget(&self.nav_f);
        builder.end(start);
    }

    fn focus(&self) -> FocusFlag {
        self.container_f.clone()
    }

    fn area(&self) -> Rect {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_table() -> DataTableState {
        DataTableState::new(
            TableId::Students,
            "students",
            "/api/students/",
            "Students",
            vec![
                Column {
                    key: "name",
                    label: "Name",
                    sortable: true,
                    render: |row| row.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                },
                Column {
                    key: "status",
                    label: "Status",
                    sortable: false,
                    render: |_| String::new(),
                },
                Column {
                    key: "created_at",
                    label: "Joined",
                    sortable: true,
                    render: |_| String::new(),
                },
            ],
        )
    }

    fn page_of(count: u64, rows: usize) -> ListPage {
        ListPage {
            rows: (0..rows).map(|i| json!({"id": i})).collect(),
            count,
        }
    }

    #[test]
    fn stale_page_is_discarded() {
        let mut table = sample_table();
        let first = table.begin_load();
        let second = table.begin_load();
        assert!(!table.apply_page(first, page_of(100, 20)));
        assert!(table.rows.is_empty());
        assert!(table.apply_page(second, page_of(42, 20)));
        assert_eq!(table.count, 42);
    }

    #[test]
    fn stale_failure_cannot_clobber_newer_page() {
        let mut table = sample_table();
        let first = table.begin_load();
        let second = table.begin_load();
        assert!(table.apply_page(second, page_of(42, 20)));
        assert!(!table.apply_failure(first));
        assert_eq!(table.rows.len(), 20);
        assert!(!table.loading);
    }

    #[test]
    fn failure_empties_the_table() {
        let mut table = sample_table();
        let seq = table.begin_load();
        table.apply_page(seq, page_of(42, 20));
        let seq = table.begin_load();
        assert!(table.apply_failure(seq));
        assert!(table.rows.is_empty());
        assert_eq!(table.count, 0);
        assert_eq!(table.table_state.selected(), None);
    }

    #[test]
    fn page_window_stays_within_bounds() {
        let mut table = sample_table();
        table.count = 200; // 10 pages of 20

        table.page = 1;
        assert_eq!(table.page_window(), vec![1, 2, 3, 4, 5]);

        table.page = 6;
        assert_eq!(table.page_window(), vec![4, 5, 6, 7, 8]);

        table.page = 10;
        assert_eq!(table.page_window(), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn page_window_shrinks_for_short_result_sets() {
        let mut table = sample_table();
        table.count = 45; // 3 pages of 20
        table.page = 2;
        assert_eq!(table.page_window(), vec![1, 2, 3]);

        table.count = 0;
        assert!(table.page_window().is_empty());
    }

    #[test]
    fn showing_text_covers_partial_last_page() {
        let mut table = sample_table();
        table.count = 45;
        table.page = 3;
        assert_eq!(table.showing_text(), "Showing 41 to 45 of 45 entries");

        table.count = 0;
        table.page = 1;
        assert_eq!(table.showing_text(), "Showing 0 to 0 of 0 entries");
    }

    #[test]
    fn search_edit_debounces_and_resets_page() {
        let mut table = sample_table();
        table.count = 200;
        table.page = 4;

        let t0 = Instant::now();
        table.push_search_char('a', t0);
        table.push_search_char('b', t0 + Duration::from_millis(300));
        assert_eq!(table.page, 1);

        // First deadline was superseded by the second keystroke.
        assert!(!table.take_due_debounce(t0 + Duration::from_millis(500)));
        assert!(table.take_due_debounce(t0 + Duration::from_millis(800)));
        // Consumed; does not fire twice.
        assert!(!table.take_due_debounce(t0 + Duration::from_millis(900)));
    }

    #[test]
    fn sort_toggle_flips_order_and_resets_page() {
        let mut table = sample_table();
        table.count = 200;
        table.page = 7;

        assert!(table.toggle_sort(0));
        assert_eq!(table.sort_by, Some("name"));
        assert_eq!(table.sort_order, SortOrder::Ascending);
        assert_eq!(table.page, 1);

        assert!(table.toggle_sort(0));
        assert_eq!(table.sort_order, SortOrder::Descending);

        // Two toggles on the active column land back on ascending.
        assert!(table.toggle_sort(0));
        assert_eq!(table.sort_order, SortOrder::Ascending);

        // Non-sortable column is refused.
        assert!(!table.toggle_sort(1));
        assert_eq!(table.sort_by, Some("name"));
    }

    #[test]
    fn sort_survives_filter_changes() {
        let mut table = sample_table();
        table.toggle_sort(0);
        table.set_filter("status", "active");
        assert_eq!(table.sort_by, Some("name"));
        assert_eq!(table.page, 1);
        assert_eq!(table.filters.get("status").map(String::as_str), Some("active"));
    }

    #[test]
    fn set_filters_replaces_the_mapping_and_resets_page() {
        let mut table = sample_table();
        table.count = 200;
        table.page = 5;
        table.set_filter("status", "active");

        let mut replacement = IndexMap::new();
        replacement.insert("branch".to_string(), "Main".to_string());
        table.set_filters(replacement);

        assert_eq!(table.page, 1);
        assert!(table.filters.get("status").is_none());
        assert_eq!(table.filters.get("branch").map(String::as_str), Some("Main"));

        table.page = 3;
        table.set_filters(IndexMap::new());
        assert_eq!(table.page, 1);
        assert!(table.filters.is_empty());
    }

    #[test]
    fn single_entry_result_set_pins_both_pager_bounds() {
        let mut table = sample_table();
        let seq = table.begin_load();
        table.apply_page(seq, page_of(1, 1));
        assert_eq!(table.showing_text(), "Showing 1 to 1 of 1 entries");
        assert_eq!(table.total_pages(), 1);
        assert!(!table.has_prev_page());
        assert!(!table.has_next_page());
    }

    #[test]
    fn filter_cycle_wraps_back_to_all() {
        let mut table = sample_table();
        let options = ["active", "inactive"];

        assert_eq!(table.cycle_filter("status", &options), Some("active"));
        assert_eq!(table.cycle_filter("status", &options), Some("inactive"));
        assert_eq!(table.cycle_filter("status", &options), None);
        assert!(table.filters.get("status").is_none());
    }

    #[test]
    fn next_sortable_column_cycles_and_wraps() {
        let mut table = sample_table();
        assert_eq!(table.next_sortable_column(), Some(0));
        table.toggle_sort(0);
        assert_eq!(table.next_sortable_column(), Some(2));
        table.toggle_sort(2);
        assert_eq!(table.next_sortable_column(), Some(0));
    }

    #[test]
    fn unsortable_table_refuses_every_toggle() {
        let mut table = sample_table().with_sortable(false);
        assert_eq!(table.next_sortable_column(), None);
        assert!(!table.toggle_sort(0));
        assert_eq!(table.sort_by, None);
    }

    #[test]
    fn construction_options_are_applied() {
        let table = sample_table()
            .with_page_size(50)
            .with_searchable(false)
            .with_empty_message("Nothing here");
        assert_eq!(table.page_size, 50);
        assert!(!table.searchable);
        assert_eq!(table.empty_message, "Nothing here");
        // page size floor
        assert_eq!(sample_table().with_page_size(0).page_size, 1);
    }

    #[test]
    fn query_reflects_table_state() {
        let mut table = sample_table();
        table.count = 200;
        table.toggle_sort(0);
        table.set_filter("status", "active");
        table.search.set_input("ahmed");
        table.set_page(3);

        let params = table.to_query().to_params();
        assert!(params.contains(&("page".to_string(), "3".to_string())));
        assert!(params.contains(&("search".to_string(), "ahmed".to_string())));
        assert!(params.contains(&("sort_by".to_string(), "name".to_string())));
        assert!(params.contains(&("status".to_string(), "active".to_string())));
    }

    #[test]
    fn applied_page_clamps_selection_and_page() {
        let mut table = sample_table();
        table.page = 9;
        table.table_state.select(Some(15));
        let seq = table.begin_load();
        assert!(table.apply_page(seq, page_of(45, 5)));
        // 45 rows at 20/page leaves 3 pages.
        assert_eq!(table.page, 3);
        assert_eq!(table.table_state.selected(), Some(4));
    }
}
