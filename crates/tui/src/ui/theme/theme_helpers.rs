//! Style and widget builders shared by the components.

use mims_types::Severity;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use super::roles::Theme;

/// Standard bordered panel with an optional title. The border picks up the
/// focus ring color while `focused` is set.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(title) = title {
        block = block.title(Span::styled(title, theme.heading_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Dialog panel whose border and title carry a severity color.
pub fn severity_block<'a, T: Theme + ?Sized>(theme: &'a T, severity: Severity, title: Option<&'a str>) -> Block<'a> {
    let style = severity_style(theme, severity);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(style)
        .style(panel_style(theme));
    if let Some(title) = title {
        block = block.title(Span::styled(title, style.add_modifier(Modifier::BOLD)));
    }
    block
}

pub fn severity_style<T: Theme + ?Sized>(theme: &T, severity: Severity) -> Style {
    match severity {
        Severity::Info => theme.info_style(),
        Severity::Success => theme.success_style(),
        Severity::Warning => theme.warning_style(),
        Severity::Error => theme.danger_style(),
    }
}

fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let roles = theme.roles();
    Style::default().bg(roles.panel).fg(roles.text)
}

pub fn header_text_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.heading_style().add_modifier(Modifier::BOLD)
}

/// Full-width header row background so the columns read as one band.
pub fn header_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let roles = theme.roles();
    Style::default().bg(roles.panel_muted).fg(roles.heading)
}

/// Alternating stripe for a body row. Striping uses distinct surface colors
/// rather than DIM so text brightness stays uniform.
pub fn row_style<T: Theme + ?Sized>(theme: &T, index: usize) -> Style {
    let roles = theme.roles();
    let bg = if index % 2 == 0 { roles.stripe_even } else { roles.stripe_odd };
    Style::default().bg(bg).fg(roles.text)
}

pub fn selected_row_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

pub fn input_style<T: Theme + ?Sized>(theme: &T, focused: bool) -> Style {
    let style = panel_style(theme);
    if focused { style.add_modifier(Modifier::BOLD) } else { style }
}

/// Multiply an RGB color's channels toward black. Non-RGB colors pass
/// through untouched.
pub fn shade(color: Color, factor: f32) -> Color {
    let f = factor.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let mul = |c: u8| (c as f32 * f).round() as u8;
            Color::Rgb(mul(r), mul(g), mul(b))
        }
        other => other,
    }
}

/// Blend an RGB color toward white. Non-RGB colors pass through untouched.
pub fn tint(color: Color, factor: f32) -> Color {
    let f = factor.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => {
            let lift = |c: u8| (c as f32 + (255.0 - c as f32) * f).round() as u8;
            Color::Rgb(lift(r), lift(g), lift(b))
        }
        other => other,
    }
}

/// Rendering flags for [`render_button`].
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub borders: Borders,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, selected: bool, borders: Borders) -> Self {
        Self {
            enabled,
            focused,
            selected,
            borders,
        }
    }
}

/// Draw a button label into `area`, styled for its enabled/focused/selected
/// combination. Borderless buttons get a column of side padding so they stay
/// legible in single-row areas.
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, opts: ButtonRenderOptions) {
    let roles = theme.roles();
    let (border_style, label_style) = if opts.enabled {
        let mut label_style = Style::default().fg(roles.accent_soft);
        if opts.selected || opts.focused {
            label_style = label_style.bg(roles.selection_bg);
        }
        (theme.border_style(opts.focused), label_style)
    } else {
        (theme.muted_style(), theme.muted_style())
    };

    let padding = if opts.borders.is_empty() {
        Padding::horizontal(1)
    } else {
        Padding::uniform(0)
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(
                Block::bordered()
                    .borders(opts.borders)
                    .border_style(border_style)
                    .padding(padding),
            )
            .style(label_style),
        area,
    );
}

/// Hint bar entries: the hotkey in bold accent, its action muted.
pub fn hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, action) in hints {
        spans.push(Span::styled(*key, theme.key_style()));
        spans.push(Span::styled(*action, theme.muted_style()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shade_and_tint_move_channels_in_opposite_directions() {
        let base = Color::Rgb(100, 150, 200);
        assert_eq!(shade(base, 0.5), Color::Rgb(50, 75, 100));
        assert_eq!(tint(Color::Rgb(0, 0, 0), 1.0), Color::Rgb(255, 255, 255));
        // Indexed colors are untouched
        assert_eq!(shade(Color::Red, 0.5), Color::Red);
    }

    #[test]
    fn hint_spans_pair_key_and_action() {
        let theme = crate::ui::theme::NordTheme::new();
        let spans = hint_spans(&theme, &[("r", " reload"), ("q", " quit")]);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "r");
        assert_eq!(spans[3].content, " quit");
    }
}
