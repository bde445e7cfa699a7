//! Shared modal dialog: one slot, replace-on-show, no stacking.

pub mod modal_component;
pub mod state;

pub use modal_component::ModalComponent;
pub use state::ModalState;
