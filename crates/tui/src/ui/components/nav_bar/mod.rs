//! Horizontal navigation bar component.
//!
//! One tab per top-level route, with rat-focus integration via a `FocusFlag`
//! per item, keyboard navigation (Left/Right/Enter), and mouse activation.
//! Activation maps to `Effect::SwitchTo`; routing itself is owned by the
//! main view.

mod nav_bar_component;
mod state;

pub use nav_bar_component::NavBarComponent;
pub use state::{NavBarState, NavItem};
