use serde_json::{Value, json};
use tabulate::ExportConfig;
use tabulate::style::PageSize;

/// Order records with a nested customer and an optional note.
pub fn orders(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|i| {
            json!({
                "id": format!("o-{i}"),
                "customer": { "name": format!("Customer {i}") },
                "amount": i * 10,
                "note": if i % 2 == 0 { Value::Null } else { json!("rush") },
            })
        })
        .collect()
}

/// A page tall enough for `rows` rows of the default height.
pub fn page_for_rows(rows: usize) -> ExportConfig {
    ExportConfig {
        page_size: PageSize::Custom {
            width: 400.0,
            height: rows as f32 * 10.0 + 5.0,
        },
        default_row_height: 10.0,
        ..ExportConfig::default()
    }
}
