//! Pending registrations screen with review actions.

mod registrations_component;

pub use registrations_component::{RegistrationsComponent, registrations_table_state};
