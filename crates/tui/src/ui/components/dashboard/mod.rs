//! Dashboard screen with aggregate statistics cards.

mod dashboard_component;
mod state;

pub use dashboard_component::DashboardComponent;
pub use state::DashboardState;
