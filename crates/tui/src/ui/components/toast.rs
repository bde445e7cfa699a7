//! Transient toast notifications anchored to the top-right corner.

use std::time::{Duration, Instant};

use mims_types::Severity;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::roles::Theme;
use crate::ui::theme::theme_helpers::severity_style;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);

/// A single notification with its expiry clock.
#[derive(Debug, Clone)]
pub struct Toast {
    pub severity: Severity,
    pub message: String,
    created: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            created: Instant::now(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    #[allow(dead_code)]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= self.duration
    }
}

/// Drop expired toasts, oldest first ordering preserved.
pub fn prune(toasts: &mut Vec<Toast>, now: Instant) {
    toasts.retain(|toast| !toast.is_expired(now));
}

/// Render the toast stack into the top-right corner of `area`.
pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Toast], theme: &dyn Theme) {
    let mut y = area.y + 1;
    for toast in toasts {
        let width = (toast.message.width() as u16 + 4).min(area.width.saturating_sub(2));
        if width < 5 || y + 3 > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, 3);
        let style = severity_style(theme, toast.severity);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Span::styled(toast.message.as_str(), theme.text_style()))
                .block(Block::default().borders(Borders::ALL).border_style(style))
                .style(theme.overlay_style()),
            rect,
        );
        y += 3;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_expires_after_its_duration() {
        let toast = Toast::new(Severity::Info, "saved").with_duration(Duration::from_millis(10));
        let now = Instant::now();
        assert!(!toast.is_expired(now));
        assert!(toast.is_expired(now + Duration::from_millis(11)));
    }

    #[test]
    fn prune_drops_only_expired_toasts() {
        let now = Instant::now();
        let mut toasts = vec![
            Toast::new(Severity::Success, "kept"),
            Toast::new(Severity::Error, "gone").with_duration(Duration::ZERO),
        ];
        prune(&mut toasts, now + Duration::from_millis(1));
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "kept");
    }
}
