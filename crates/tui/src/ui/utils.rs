//! Layout helpers shared across UI components.

use ratatui::prelude::*;

/// Centers a fixed-size rectangle within a parent, clamping to the parent's
/// bounds when the requested size does not fit.
pub fn centered_fixed_rect(width: u16, height: u16, r: Rect) -> Rect {
    let w = width.min(r.width);
    let h = height.min(r.height);
    let x = r.x + (r.width - w) / 2;
    let y = r.y + (r.height - h) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_fixed_rect_clamps_to_parent() {
        let parent = Rect::new(0, 0, 40, 10);
        let rect = centered_fixed_rect(60, 20, parent);
        assert_eq!(rect, parent);

        let rect = centered_fixed_rect(20, 6, parent);
        assert_eq!(rect, Rect::new(10, 2, 20, 6));
    }
}
