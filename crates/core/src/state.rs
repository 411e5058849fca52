//! Per-model export state, kept across the passes of a paginated export.

use crate::table::index::RowIndex;
use crate::table::resolver::{ResolvedRow, TableResolver};
use std::collections::HashMap;
use tabulate_layout::LayoutError;
use tabulate_types::ModelId;

/// Lifecycle of one model instance across possibly many pages.
///
/// `Finished` is terminal. A `Suspended` model re-enters export only after the next
/// pass resumes it back to `Measuring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelState {
    #[default]
    NotStarted,
    Measuring,
    Exporting,
    Suspended,
    Finished,
}

impl ModelState {
    fn variant_name(&self) -> &'static str {
        match self {
            ModelState::NotStarted => "NotStarted",
            ModelState::Measuring => "Measuring",
            ModelState::Exporting => "Exporting",
            ModelState::Suspended => "Suspended",
            ModelState::Finished => "Finished",
        }
    }
}

/// Where a table picks up on its next pass.
#[derive(Debug)]
pub struct TableProgress {
    pub resolver: TableResolver,
    /// The next row index to request.
    pub next: RowIndex,
    /// A row resolved on a previous pass that did not fit; emitted before resolving further.
    pub pending: Option<ResolvedRow>,
    /// Whether the table and column start entities were emitted.
    pub opened: bool,
}

impl TableProgress {
    pub fn new(resolver: TableResolver) -> Self {
        Self {
            resolver,
            next: RowIndex::default(),
            pending: None,
            opened: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct ExportStates {
    states: HashMap<ModelId, ModelState>,
    tables: HashMap<ModelId, TableProgress>,
}

impl ExportStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: ModelId) -> ModelState {
        self.states.get(&id).copied().unwrap_or_default()
    }

    pub fn is_finished(&self, id: ModelId) -> bool {
        self.state(id) == ModelState::Finished
    }

    /// Measuring only moves a model that has not started yet; later re-measures keep the state.
    pub fn begin_measure(&mut self, id: ModelId) {
        if self.state(id) == ModelState::NotStarted {
            self.states.insert(id, ModelState::Measuring);
        }
    }

    pub fn begin_export(&mut self, id: ModelId) -> Result<(), LayoutError> {
        match self.state(id) {
            ModelState::NotStarted | ModelState::Measuring => {
                self.states.insert(id, ModelState::Exporting);
                Ok(())
            }
            other => Err(LayoutError::StateMismatch("Measuring", other.variant_name())),
        }
    }

    /// Readies a model suspended on the previous pass for re-measuring on this one.
    pub fn resume(&mut self, id: ModelId) -> Result<(), LayoutError> {
        match self.state(id) {
            ModelState::Suspended => {
                self.states.insert(id, ModelState::Measuring);
                Ok(())
            }
            other => Err(LayoutError::StateMismatch("Suspended", other.variant_name())),
        }
    }

    pub fn suspend(&mut self, id: ModelId) -> Result<(), LayoutError> {
        self.leave_exporting(id, ModelState::Suspended)
    }

    pub fn finish(&mut self, id: ModelId) -> Result<(), LayoutError> {
        self.tables.remove(&id);
        self.leave_exporting(id, ModelState::Finished)
    }

    fn leave_exporting(&mut self, id: ModelId, next: ModelState) -> Result<(), LayoutError> {
        match self.state(id) {
            ModelState::Exporting => {
                self.states.insert(id, next);
                Ok(())
            }
            other => Err(LayoutError::StateMismatch("Exporting", other.variant_name())),
        }
    }

    /// Forgets everything about `ids`, so they export from scratch on the next pass.
    pub fn reset<I: IntoIterator<Item = ModelId>>(&mut self, ids: I) {
        for id in ids {
            self.states.remove(&id);
            self.tables.remove(&id);
        }
    }

    pub fn take_table(&mut self, id: ModelId) -> Option<TableProgress> {
        self.tables.remove(&id)
    }

    pub fn store_table(&mut self, id: ModelId, progress: TableProgress) {
        self.tables.insert(id, progress);
    }
}
