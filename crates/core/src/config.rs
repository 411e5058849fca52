use once_cell::sync::Lazy;
use std::collections::HashMap;
use tabulate_style::{OverflowPolicy, PageSize};
use tabulate_types::ModelKind;

/// Every model kind paginates with RETRY unless configured otherwise.
static DEFAULT_OVERFLOW: Lazy<HashMap<ModelKind, OverflowPolicy>> = Lazy::new(|| {
    ModelKind::ALL
        .iter()
        .map(|kind| (*kind, OverflowPolicy::Retry))
        .collect()
});

/// Engine-wide settings for one `Exporter`.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub page_size: PageSize,
    /// Used for rows without a `RowHeight` whose cells the backend cannot measure.
    pub default_row_height: f32,
    /// Used for columns without a fixed `ColumnWidth`.
    pub default_column_width: f32,
    /// Guards against content that never converges under RETRY.
    pub max_pages: usize,
    pub default_overflow: HashMap<ModelKind, OverflowPolicy>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            default_row_height: 12.0,
            default_column_width: 64.0,
            max_pages: 10_000,
            default_overflow: DEFAULT_OVERFLOW.clone(),
        }
    }
}

impl ExportConfig {
    pub fn overflow_for(&self, kind: ModelKind) -> OverflowPolicy {
        self.default_overflow
            .get(&kind)
            .copied()
            .unwrap_or(OverflowPolicy::Retry)
    }
}
