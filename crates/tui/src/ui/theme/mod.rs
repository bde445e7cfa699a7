//! Theme styling module for the TUI UI layer.
//!
//! This module defines the Nord palette, semantic theme roles, and helper
//! builders for Ratatui widgets and styles. Prefer these helpers over
//! hard-coding colors to keep the UI consistent.

use std::env;

use tracing::debug;

pub mod nord;
pub mod roles;
pub mod theme_helpers;

pub use nord::{NordTheme, NordThemeHighContrast};
pub use roles::Theme;

/// Selects a theme from the `MIMS_THEME` environment variable.
///
/// `nord-high-contrast` picks the brightened variant; anything else falls
/// back to the default Nord palette.
pub fn load_from_env() -> Box<dyn Theme> {
    if let Ok(name) = env::var("MIMS_THEME")
        && name.trim().eq_ignore_ascii_case("nord-high-contrast")
    {
        debug!("using high-contrast theme variant");
        return Box::new(NordThemeHighContrast::new());
    }
    Box::new(NordTheme::new())
}
