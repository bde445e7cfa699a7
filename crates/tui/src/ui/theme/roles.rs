use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color slots the widgets draw from.
///
/// Components never name palette colors directly; they ask the active theme
/// for a slot, so a variant swap changes the whole UI at once.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    // Surfaces
    pub background: Color,
    pub panel: Color,
    pub panel_muted: Color,
    pub border: Color,
    pub focus_ring: Color,

    // Text
    pub text: Color,
    pub heading: Color,
    pub muted: Color,

    // Accents
    pub accent: Color,
    pub accent_soft: Color,

    // Status
    pub info: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,

    // Selection and overlays
    pub selection_fg: Color,
    pub selection_bg: Color,
    /// Backdrop behind the modal dialog; darker than `background` so the
    /// dialog reads as elevated.
    pub overlay: Color,

    // Table striping
    pub stripe_even: Color,
    pub stripe_odd: Color,
}

/// A theme is a role table plus the style builders every widget shares.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }

    fn heading_style(&self) -> Style {
        Style::default().fg(self.roles().heading)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.roles().muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.focus_ring } else { roles.border })
    }

    fn selection_style(&self) -> Style {
        let roles = self.roles();
        Style::default().fg(roles.selection_fg).bg(roles.selection_bg)
    }

    fn overlay_style(&self) -> Style {
        Style::default().bg(self.roles().overlay)
    }

    fn info_style(&self) -> Style {
        Style::default().fg(self.roles().info)
    }

    fn success_style(&self) -> Style {
        Style::default().fg(self.roles().success)
    }

    fn warning_style(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }

    fn danger_style(&self) -> Style {
        Style::default().fg(self.roles().danger)
    }

    fn accent_style(&self) -> Style {
        Style::default().fg(self.roles().accent)
    }

    /// Bold accent, used for hotkey labels in the hint bar.
    fn key_style(&self) -> Style {
        Style::default().fg(self.roles().accent).add_modifier(Modifier::BOLD)
    }
}
