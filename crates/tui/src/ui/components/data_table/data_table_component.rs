use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use indexmap::IndexMap;
use mims_types::{Effect, Msg, SortOrder, TableId};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    ui::{
        components::component::Component,
        theme::{roles::Theme as UiTheme, theme_helpers as th},
    },
};

/// Actions attached to footer hit areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FooterAction {
    Prev,
    Next,
    Page(u64),
}

/// Generic server-backed table: search box, sortable grid, footer pagination.
///
/// The component owns only render artifacts (hit-test areas); the table data
/// and query state live on the [`App`] so the focus ring and background
/// executor can reach them.
#[derive(Debug)]
pub struct DataTableComponent {
    id: TableId,
    search_area: Rect,
    grid_inner: Rect,
    header_areas: Vec<Rect>,
    footer_areas: Vec<(Rect, FooterAction)>,
}

impl DataTableComponent {
    pub fn new(id: TableId) -> Self {
        Self {
            id,
            search_area: Rect::default(),
            grid_inner: Rect::default(),
            header_areas: Vec::new(),
            footer_areas: Vec::new(),
        }
    }

    fn render_search(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let (ctx, table) = app.table_parts(self.id);
        let theme = &*ctx.theme;
        let focused = table.search_f.get();

        if !table.searchable {
            self.search_area = Rect::default();
            self.render_filter_chips(frame, area, app);
            return;
        }

        let chunks = Layout::horizontal([Constraint::Min(24), Constraint::Length(30)]).split(area);
        self.search_area = chunks[0];

        let input = Paragraph::new(table.search.input())
            .block(
                Block::default()
                    .title(Line::from(Span::styled(
                        "Search",
                        if focused {
                            theme.key_style()
                        } else {
                            theme.heading_style()
                        },
                    )))
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(focused)),
            )
            .style(th::input_style(theme, focused));
        frame.render_widget(input, chunks[0]);

        if focused {
            let prefix = &table.search.input()[..table.search.cursor()];
            let x = chunks[0].x + 1 + prefix.width() as u16;
            frame.set_cursor_position(Position::new(x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
        }

        self.render_filter_chips(frame, chunks[1], app);
    }

    /// Active filters as `key=value` chips in a bordered box.
    fn render_filter_chips(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let (ctx, table) = app.table_parts(self.id);
        let theme = &*ctx.theme;
        let chips = table
            .filters
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("  ");
        let filters = Paragraph::new(chips)
            .block(
                Block::default()
                    .title(Span::styled("Filters", theme.heading_style()))
                    .borders(Borders::ALL)
                    .border_style(theme.border_style(false)),
            )
            .style(theme.muted_style());
        frame.render_widget(filters, area);
    }

    fn render_grid(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let throbber = app.throbber_frame();
        let (ctx, table) = app.table_parts(self.id);
        let theme = &*ctx.theme;
        let focused = table.grid_f.get();

        let title = if table.loading {
            format!("{} {}", table.title, throbber)
        } else {
            table.title.to_string()
        };
        let block = th::block(theme, Some(title.as_str()), focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.grid_inner = inner;

        let column_count = table.columns.len().max(1) as u32;
        self.header_areas = (0..table.columns.len())
            .map(|i| {
                let width = inner.width / column_count as u16;
                Rect::new(inner.x + width * i as u16, inner.y, width, 1)
            })
            .collect();

        if table.rows.is_empty() {
            // Single full-width placeholder row under the header.
            let header = Row::new(
                table
                    .columns
                    .iter()
                    .map(|column| Cell::from(column.label))
                    .collect::<Vec<_>>(),
            )
            .style(th::header_row_style(theme));
            let widths = vec![Constraint::Ratio(1, column_count); table.columns.len()];
            frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), inner);

            let message = if table.loading { "Loading..." } else { table.empty_message };
            let placeholder_area = Rect::new(inner.x, inner.y.saturating_add(1), inner.width, 1);
            frame.render_widget(
                Paragraph::new(message).centered().style(theme.muted_style()),
                placeholder_area,
            );
            return;
        }

        let header = Row::new(
            table
                .columns
                .iter()
                .map(|column| {
                    let mut label = column.label.to_string();
                    if table.sort_by == Some(column.key) {
                        label.push_str(match table.sort_order {
                            SortOrder::Ascending => " ▲",
                            SortOrder::Descending => " ▼",
                        });
                    }
                    Cell::from(Span::styled(label, th::header_text_style(theme)))
                })
                .collect::<Vec<_>>(),
        )
        .style(th::header_row_style(theme));

        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Row::new(
                    table
                        .columns
                        .iter()
                        .map(|column| Cell::from((column.render)(row)))
                        .collect::<Vec<_>>(),
                )
                .style(th::row_style(theme, i))
            })
            .collect::<Vec<_>>();

        let widths = vec![Constraint::Ratio(1, column_count); table.columns.len()];
        let widget = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(if focused {
                th::selected_row_style(theme)
            } else {
                theme.selection_style()
            });
        frame.render_stateful_widget(widget, inner, &mut table.table_state);
    }

    fn render_footer(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        let (ctx, table) = app.table_parts(self.id);
        let theme = &*ctx.theme;
        let nav_focused = table.nav_f.get();

        self.footer_areas.clear();

        let summary = table.showing_text();
        let window = table.page_window();

        // Right-aligned pager: ‹ Prev, numbered window, Next ›.
        let mut spans: Vec<(String, Option<FooterAction>)> = Vec::new();
        if !window.is_empty() {
            spans.push(("‹ Prev".to_string(), Some(FooterAction::Prev)));
            for page in &window {
                spans.push((format!(" {page} "), Some(FooterAction::Page(*page))));
            }
            spans.push(("Next ›".to_string(), Some(FooterAction::Next)));
        }
        let pager_width: u16 = spans.iter().map(|(text, _)| text.width() as u16 + 1).sum();

        let chunks = Layout::horizontal([Constraint::Min(10), Constraint::Length(pager_width)]).split(area);
        frame.render_widget(Paragraph::new(summary).style(theme.muted_style()), chunks[0]);

        let mut x = chunks[1].x;
        let mut rendered: Vec<Span> = Vec::new();
        for (text, action) in spans {
            let width = text.width() as u16;
            let style = match action {
                Some(FooterAction::Page(page)) if page == table.page => th::selected_row_style(theme),
                Some(FooterAction::Prev) if !table.has_prev_page() => theme.muted_style(),
                Some(FooterAction::Next) if !table.has_next_page() => theme.muted_style(),
                _ if nav_focused => theme.accent_style(),
                _ => theme.heading_style(),
            };
            if let Some(action) = action {
                self.footer_areas.push((Rect::new(x, chunks[1].y, width, 1), action));
            }
            rendered.push(Span::styled(text, style));
            rendered.push(Span::raw(" "));
            x += width + 1;
        }
        frame.render_widget(Paragraph::new(Line::from(rendered)), chunks[1]);
    }

    fn handle_search_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let grid_flag = app.table(self.id).grid_f.clone();
        let table = app.table_mut(self.id);
        match key.code {
            KeyCode::Char(c) => table.push_search_char(c, Instant::now()),
            KeyCode::Backspace => table.backspace_search(Instant::now()),
            KeyCode::Left => table.search.move_left(),
            KeyCode::Right => table.search.move_right(),
            KeyCode::Enter => {
                table.cancel_debounce();
                table.page = 1;
                app.focus.focus(&grid_flag);
                return vec![Effect::ReloadTable(self.id)];
            }
            KeyCode::Esc => {
                app.focus.focus(&grid_flag);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_grid_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let table = app.table_mut(self.id);
        match key.code {
            KeyCode::Up => table.select_prev_row(),
            KeyCode::Down => table.select_next_row(),
            KeyCode::Home => table.select_first_row(),
            KeyCode::End => table.select_last_row(),
            KeyCode::Left | KeyCode::PageUp => {
                if table.reduce_prev_page() {
                    return vec![Effect::ReloadTable(self.id)];
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                if table.reduce_next_page() {
                    return vec![Effect::ReloadTable(self.id)];
                }
            }
            KeyCode::Char('s') => {
                if let Some(column) = table.next_sortable_column()
                    && table.toggle_sort(column)
                {
                    return vec![Effect::ReloadTable(self.id)];
                }
            }
            KeyCode::Char('S') => {
                if let Some(current) = table.sort_by
                    && let Some(idx) = table.columns.iter().position(|c| c.key == current)
                    && table.toggle_sort(idx)
                {
                    return vec![Effect::ReloadTable(self.id)];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_nav_key(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let table = app.table_mut(self.id);
        let changed = match key.code {
            KeyCode::Left => table.reduce_prev_page(),
            KeyCode::Right => table.reduce_next_page(),
            KeyCode::Home => table.reduce_first_page(),
            KeyCode::End => table.reduce_last_page(),
            _ => false,
        };
        if changed {
            vec![Effect::ReloadTable(self.id)]
        } else {
            Vec::new()
        }
    }
}

impl Component for DataTableComponent {
    fn handle_message(&mut self, app: &mut App, msg: &Msg) -> Vec<Effect> {
        if matches!(msg, Msg::Tick) && app.table_mut(self.id).take_due_debounce(Instant::now()) {
            return vec![Effect::ReloadTable(self.id)];
        }
        Vec::new()
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let table = app.table(self.id);
        let (search, grid, nav) = (table.search_f.get(), table.grid_f.get(), table.nav_f.get());

        if search {
            return self.handle_search_key(app, key);
        }

        // Keys shared by the grid and footer focus targets.
        match key.code {
            KeyCode::Char('/') if app.table(self.id).searchable => {
                let flag = app.table(self.id).search_f.clone();
                app.focus.focus(&flag);
                return Vec::new();
            }
            KeyCode::Char('r') => return vec![Effect::ReloadTable(self.id)],
            KeyCode::Char('c') => {
                let table = app.table_mut(self.id);
                if !table.filters.is_empty() {
                    table.set_filters(IndexMap::new());
                    return vec![Effect::ReloadTable(self.id)];
                }
                return Vec::new();
            }
            _ => {}
        }

        if grid {
            return self.handle_grid_key(app, key);
        }
        if nav {
            return self.handle_nav_key(app, key);
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        let position = Position::new(column, row);

        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.search_area.contains(position) {
                    let flag = app.table(self.id).search_f.clone();
                    app.focus.focus(&flag);
                    return Vec::new();
                }
                if let Some(index) = self.header_areas.iter().position(|area| area.contains(position)) {
                    let table = app.table_mut(self.id);
                    if table.toggle_sort(index) {
                        return vec![Effect::ReloadTable(self.id)];
                    }
                    return Vec::new();
                }
                if self.grid_inner.contains(position) && row > self.grid_inner.y {
                    let flag = app.table(self.id).grid_f.clone();
                    app.focus.focus(&flag);
                    let table = app.table_mut(self.id);
                    let offset = table.table_state.offset();
                    let index = (row - self.grid_inner.y - 1) as usize + offset;
                    if index < table.rows.len() {
                        table.table_state.select(Some(index));
                    }
                    return Vec::new();
                }
                if let Some((_, action)) = self.footer_areas.iter().find(|(area, _)| area.contains(position)) {
                    let table = app.table_mut(self.id);
                    let changed = match action {
                        FooterAction::Prev => table.reduce_prev_page(),
                        FooterAction::Next => table.reduce_next_page(),
                        FooterAction::Page(page) => table.set_page(*page),
                    };
                    if changed {
                        return vec![Effect::ReloadTable(self.id)];
                    }
                }
            }
            MouseEventKind::ScrollDown if self.grid_inner.contains(position) => {
                app.table_mut(self.id).select_next_row();
            }
            MouseEventKind::ScrollUp if self.grid_inner.contains(position) => {
                app.table_mut(self.id).select_prev_row();
            }
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        app.table_mut(self.id).area = rect;
        let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)]).split(rect);
        self.render_search(frame, chunks[0], app);
        self.render_grid(frame, chunks[1], app);
        self.render_footer(frame, chunks[2], app);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        let table = app.table(self.id);
        if table.search_f.get() {
            return th::hint_spans(
                theme,
                &[("Enter", " apply  "), ("Esc", " back  "), ("←/→", " cursor")],
            );
        }
        let mut hints: Vec<(&str, &str)> = Vec::new();
        if table.searchable {
            hints.push(("/", " search  "));
        }
        if table.sortable {
            hints.push(("s", " sort  "));
            hints.push(("S", " reverse  "));
        }
        hints.extend([("←/→", " page  "), ("c", " clear filters  "), ("r", " reload")]);
        th::hint_spans(theme, &hints)
    }

    fn on_route_enter(&mut self, _app: &mut App) -> Vec<Effect> {
        vec![Effect::ReloadTable(self.id)]
    }
}
