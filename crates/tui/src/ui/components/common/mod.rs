pub mod modal;
pub mod text_input;

pub use modal::{ModalComponent, ModalState};
pub use text_input::TextInputState;
