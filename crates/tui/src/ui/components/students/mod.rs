//! Students list screen built on the shared data table.

mod students_component;

pub use students_component::{StudentsComponent, students_table_state};
