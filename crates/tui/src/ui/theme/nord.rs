//! Nord palette mapped onto the application's theme roles, in a default and
//! a high-contrast variant.

use ratatui::style::Color;

use super::{
    roles::{Theme, ThemeRoles},
    theme_helpers::{shade, tint},
};

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

// Polar Night surfaces, darkest to lightest.
const NIGHT: [Color; 4] = [rgb(0x2E3440), rgb(0x3B4252), rgb(0x434C5E), rgb(0x4C566A)];
// Snow Storm foregrounds.
const SNOW: [Color; 3] = [rgb(0xD8DEE9), rgb(0xE5E9F0), rgb(0xECEFF4)];
// Frost accents.
const FROST_LIGHT: Color = rgb(0x88C0D0);
const FROST_BLUE: Color = rgb(0x81A1C1);
const FROST_DEEP: Color = rgb(0x5E81AC);
// Aurora status colors.
const AURORA_RED: Color = rgb(0xBF616A);
const AURORA_ORANGE: Color = rgb(0xD08770);
const AURORA_YELLOW: Color = rgb(0xEBCB8B);
const AURORA_GREEN: Color = rgb(0xA3BE8C);

// Muted text sits between Polar Night and Snow Storm.
const DIM_TEXT: Color = rgb(0x616E88);

fn default_roles() -> ThemeRoles {
    ThemeRoles {
        background: NIGHT[0],
        panel: NIGHT[1],
        panel_muted: NIGHT[2],
        border: NIGHT[1],
        focus_ring: FROST_LIGHT,

        text: SNOW[0],
        heading: SNOW[1],
        muted: DIM_TEXT,

        accent: FROST_LIGHT,
        accent_soft: FROST_BLUE,

        info: FROST_BLUE,
        success: AURORA_GREEN,
        warning: AURORA_ORANGE,
        danger: AURORA_RED,

        selection_fg: SNOW[2],
        selection_bg: NIGHT[3],
        overlay: rgb(0x1A1E28),

        stripe_even: shade(NIGHT[1], 0.60),
        stripe_odd: shade(NIGHT[1], 0.72),
    }
}

fn high_contrast_roles() -> ThemeRoles {
    let base = default_roles();
    ThemeRoles {
        panel_muted: tint(base.panel_muted, 0.15),
        border: tint(base.border, 0.30),

        text: SNOW[2],
        heading: SNOW[2],
        muted: SNOW[1],

        warning: AURORA_YELLOW,
        selection_bg: tint(base.selection_bg, 0.10),
        focus_ring: FROST_DEEP,
        stripe_even: shade(NIGHT[1], 0.50),
        stripe_odd: shade(NIGHT[3], 0.50),
        ..base
    }
}

/// Default Nord theme tuned for dark terminals.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self { roles: default_roles() }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

/// Brightened variant with stronger text and border contrast.
#[derive(Debug, Clone)]
pub struct NordThemeHighContrast {
    roles: ThemeRoles,
}

impl NordThemeHighContrast {
    pub fn new() -> Self {
        Self {
            roles: high_contrast_roles(),
        }
    }
}

impl Default for NordThemeHighContrast {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordThemeHighContrast {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_unpacks_hex_triplets() {
        assert_eq!(rgb(0x2E3440), Color::Rgb(0x2E, 0x34, 0x40));
    }

    #[test]
    fn variants_share_the_status_colors() {
        let default = NordTheme::new();
        let bright = NordThemeHighContrast::new();
        assert_eq!(default.roles().danger, bright.roles().danger);
        assert_eq!(default.roles().success, bright.roles().success);
        // but the warning slot is brightened
        assert_ne!(default.roles().warning, bright.roles().warning);
    }
}
