use crate::LayoutError;
use crate::layout::Layout;
use std::collections::BTreeSet;
use tabulate_types::{ModelId, Orientation, Rect};

/// The nested layout scopes of one export pass.
///
/// A scope is opened when a composite model starts exporting and closed when it
/// returns; closing applies the scope's used extent to its parent. Owners of scopes
/// that ended in RETRY are remembered until the next pass resumes them.
#[derive(Debug)]
pub struct LayoutStack {
    root: Rect,
    scopes: Vec<Layout>,
    suspended: BTreeSet<ModelId>,
}

impl LayoutStack {
    pub fn new(root: Rect) -> Self {
        Self {
            root,
            scopes: Vec::new(),
            suspended: BTreeSet::new(),
        }
    }

    /// The page area scopes without a parent are bounded by.
    pub fn root(&self) -> Rect {
        self.root
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Opens a scope for `owner`.
    ///
    /// Without an explicit region the scope takes whatever the parent has left
    /// from its cursor on, or the root area when there is no parent.
    pub fn open(
        &mut self,
        owner: ModelId,
        orientation: Orientation,
        region: Option<Rect>,
    ) -> &mut Layout {
        let bounds = region.unwrap_or_else(|| match self.scopes.last() {
            Some(parent) => parent.remaining_region(parent.cursor()),
            None => self.root,
        });
        log::trace!(
            "Opening {:?} layout for {} at depth {} with bounds {:?}",
            orientation,
            owner,
            self.scopes.len(),
            bounds
        );
        self.scopes.push(Layout::new(owner, bounds, orientation));
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Closes the innermost scope, applying its used extent to the parent scope.
    pub fn close(&mut self) -> Result<Layout, LayoutError> {
        let layout = self.scopes.pop().ok_or(LayoutError::NoActiveLayout)?;
        if let Some(parent) = self.scopes.last_mut() {
            parent.absorb(layout.used_rect());
        }
        Ok(layout)
    }

    pub fn current(&self) -> Result<&Layout, LayoutError> {
        self.scopes.last().ok_or(LayoutError::NoActiveLayout)
    }

    pub fn current_mut(&mut self) -> Result<&mut Layout, LayoutError> {
        self.scopes.last_mut().ok_or(LayoutError::NoActiveLayout)
    }

    /// Marks the scope owned by `owner` as suspended under RETRY.
    pub fn suspend(&mut self, owner: ModelId) {
        self.suspended.insert(owner);
    }

    /// Drains the suspended owners, in id order, for the next pass to resume.
    pub fn resume_suspended(&mut self) -> Vec<ModelId> {
        let resumed: Vec<ModelId> = std::mem::take(&mut self.suspended).into_iter().collect();
        if !resumed.is_empty() {
            log::debug!("Resuming {} suspended node(s): {:?}", resumed.len(), resumed);
        }
        resumed
    }

    /// Discards all scopes left over from the previous pass and rebinds the root area.
    pub fn reset_layouts(&mut self, root: Rect) {
        if !self.scopes.is_empty() {
            log::trace!("Discarding {} exhausted layout scope(s)", self.scopes.len());
        }
        self.scopes.clear();
        self.root = root;
    }
}
