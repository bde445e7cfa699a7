use mims_types::DashboardStats;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

/// State for the dashboard screen: the latest statistics snapshot plus a
/// loading flag for the throbber.
#[derive(Debug)]
pub struct DashboardState {
    pub stats: Option<DashboardStats>,
    pub loading: bool,
    pub container_focus: FocusFlag,
    pub area: Rect,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            stats: None,
            loading: false,
            container_focus: FocusFlag::named("dashboard"),
            area: Rect::default(),
        }
    }
}

impl DashboardState {
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn apply_stats(&mut self, stats: DashboardStats) {
        self.loading = false;
        self.stats = Some(stats);
    }

    /// A failed refresh keeps the previous snapshot on screen.
    pub fn apply_failure(&mut self) {
        self.loading = false;
    }
}

impl HasFocus for DashboardState {
    fn build(&self, builder: &mut FocusBuilder) {
        builder.leaf_widget(self);
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
    fn failure_keeps_last_snapshot() {
        let mut dashboard = DashboardState::default();
        dashboard.begin_load();
        dashboard.apply_stats(DashboardStats::default());
        assert!(dashboard.stats.is_some());

        dashboard.begin_load();
        dashboard.apply_failure();
        assert!(!dashboard.loading);
        assert!(dashboard.stats.is_some());
    }
}
