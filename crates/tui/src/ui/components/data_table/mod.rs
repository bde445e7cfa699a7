//! Server-backed paginated table: state, reducers, and the rendering
//! component shared by the list screens.

pub mod data_table_component;
pub mod state;

pub use data_table_component::DataTableComponent;
pub use state::{Column, DataTableState, PAGE_WINDOW, SEARCH_DEBOUNCE};

use serde_json::Value;

/// Project a string field out of an opaque row, with a dash for absent
/// values. Shared by the screens' column render functions.
pub(crate) fn str_cell(row: &Value, key: &str) -> String {
    match row.get(key) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn str_cell_handles_missing_and_typed_fields() {
        let row = json!({"name": "Ahmed", "age": 12, "active": true, "blank": ""});
        assert_eq!(str_cell(&row, "name"), "Ahmed");
        assert_eq!(str_cell(&row, "age"), "12");
        assert_eq!(str_cell(&row, "active"), "true");
        assert_eq!(str_cell(&row, "blank"), "-");
        assert_eq!(str_cell(&row, "missing"), "-");
    }
}
