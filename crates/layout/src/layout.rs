use crate::LayoutError;
use std::collections::{BTreeMap, HashMap};
use tabulate_types::geometry::EPSILON;
use tabulate_types::{ModelId, Orientation, Position, Rect, Size};

/// How a placed unit relates to the layout's maximum extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Fits,
    /// Horizontal flow only: the unit did not fit the current line and was
    /// moved to the start of the next one.
    HorizontalOverflow,
    /// The unit crosses the bottom of the layout. Its model's overflow policy decides.
    VerticalOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub bbox: Rect,
    pub fit: Fit,
}

impl Placement {
    pub fn overflows(&self) -> bool {
        self.fit == Fit::VerticalOverflow
    }
}

/// Positioning state of one composite model's export scope.
///
/// Holds the origin and maximum extent, the flow orientation, the measured sizes of
/// children and the reservations of children that were suspended under RETRY.
#[derive(Debug, Clone)]
pub struct Layout {
    owner: ModelId,
    orientation: Orientation,
    bounds: Rect,
    cursor: Position,
    line_bottom: f32,
    used: Option<Rect>,
    measured: HashMap<ModelId, Size>,
    suspended: BTreeMap<ModelId, Rect>,
    placed: usize,
}

impl Layout {
    pub fn new(owner: ModelId, bounds: Rect, orientation: Orientation) -> Self {
        Self {
            owner,
            orientation,
            bounds,
            cursor: bounds.left_top(),
            line_bottom: bounds.y,
            used: None,
            measured: HashMap::new(),
            suspended: BTreeMap::new(),
            placed: 0,
        }
    }

    pub fn owner(&self) -> ModelId {
        self.owner
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn max_right_bottom(&self) -> Position {
        self.bounds.right_bottom()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// True until the first unit is allocated.
    pub fn is_empty(&self) -> bool {
        self.placed == 0
    }

    /// Space left between the cursor and the maximum extent.
    pub fn available_size(&self) -> Size {
        let max = self.max_right_bottom();
        Size::new(
            (max.x - self.cursor.x).max(0.0),
            (max.y - self.cursor.y).max(0.0),
        )
    }

    /// Region from `from` to the maximum extent, used as the bounds of a child scope.
    pub fn remaining_region(&self, from: Position) -> Rect {
        Rect::from_corners(from, self.max_right_bottom())
    }

    /// The union of everything allocated so far, or an empty rectangle at the origin.
    pub fn used_rect(&self) -> Rect {
        self.used
            .unwrap_or_else(|| Rect::at(self.bounds.left_top(), Size::zero()))
    }

    // --- Measuring ---

    pub fn record_measure(&mut self, id: ModelId, size: Size) {
        self.measured.insert(id, size);
    }

    pub fn measured(&self, id: ModelId) -> Option<Size> {
        self.measured.get(&id).copied()
    }

    /// Returns the cached size of `id`, measuring it with `measure` on first use.
    pub fn measure_with<F, E>(&mut self, id: ModelId, measure: F) -> Result<Size, E>
    where
        F: FnOnce(Size) -> Result<Size, E>,
    {
        if let Some(size) = self.measured(id) {
            return Ok(size);
        }
        let size = measure(self.available_size())?;
        self.record_measure(id, size);
        Ok(size)
    }

    // --- Placement ---

    /// Places a previously measured child at the cursor.
    ///
    /// Fitting units (including wrapped ones) are allocated immediately. A vertically
    /// overflowing unit is left unallocated for its overflow policy to resolve.
    pub fn place(&mut self, id: ModelId) -> Result<Placement, LayoutError> {
        let size = self.measured(id).ok_or(LayoutError::NotMeasured(id))?;
        Ok(self.place_size(size))
    }

    /// Places a unit of known size that has no model of its own (e.g. a table row).
    pub fn place_size(&mut self, size: Size) -> Placement {
        let max = self.max_right_bottom();
        let mut position = self.cursor;
        let mut fit = Fit::Fits;

        if self.orientation == Orientation::Horizontal
            && position.x > self.bounds.x + EPSILON
            && position.x + size.width > max.x + EPSILON
        {
            position = Position::new(self.bounds.x, self.line_bottom);
            fit = Fit::HorizontalOverflow;
            log::trace!("Layout {}: wrapping to next line at y={:.2}", self.owner, position.y);
        }

        let bbox = Rect::at(position, size);
        if bbox.bottom() > max.y + EPSILON {
            return Placement {
                bbox,
                fit: Fit::VerticalOverflow,
            };
        }

        self.allocate(bbox);
        Placement { bbox, fit }
    }

    /// Position where the next composite child starts, wrapping in horizontal flow
    /// when `width` does not fit on the current line.
    pub fn next_position(&mut self, width: f32) -> Position {
        let max = self.max_right_bottom();
        if self.orientation == Orientation::Horizontal
            && self.cursor.x > self.bounds.x + EPSILON
            && self.cursor.x + width > max.x + EPSILON
        {
            self.cursor = Position::new(self.bounds.x, self.line_bottom);
        }
        self.cursor
    }

    /// Records `rect` as used space and advances the cursor past it.
    pub fn allocate(&mut self, rect: Rect) {
        self.used = Some(match self.used {
            Some(used) => used.union(&rect),
            None => rect,
        });
        self.line_bottom = self.line_bottom.max(rect.bottom());
        self.cursor = match self.orientation {
            Orientation::Vertical => {
                Position::new(self.bounds.x, self.cursor.y.max(rect.bottom()))
            }
            Orientation::Horizontal => Position::new(rect.right(), rect.y),
        };
        self.placed += 1;
    }

    /// Applies the extent a child scope ended up using.
    pub fn absorb(&mut self, child_extent: Rect) {
        if child_extent.size().is_zero() {
            return;
        }
        self.allocate(child_extent);
    }

    // --- Suspension bookkeeping ---

    /// Reserves space for a unit that will be rendered on a later pass.
    ///
    /// The reservation is the unit's bounding box clipped to the maximum extent. Reserving
    /// the same id again returns the existing reservation without allocating more space.
    pub fn reserve(&mut self, id: ModelId, bbox: Rect) -> Rect {
        if let Some(existing) = self.suspended.get(&id) {
            return *existing;
        }
        let reserved = bbox.clip_to(self.max_right_bottom());
        self.allocate(reserved);
        self.suspended.insert(id, reserved);
        log::debug!("Layout {}: reserved {:?} for suspended {}", self.owner, reserved, id);
        reserved
    }

    pub fn reservation(&self, id: ModelId) -> Option<Rect> {
        self.suspended.get(&id).copied()
    }

    pub fn suspended(&self) -> impl Iterator<Item = ModelId> + '_ {
        self.suspended.keys().copied()
    }

    pub fn has_suspended(&self) -> bool {
        !self.suspended.is_empty()
    }
}
