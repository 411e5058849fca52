use crate::layout::{Layout, Placement};
use tabulate_style::OverflowPolicy;
use tabulate_types::{ModelId, Rect};

/// What the owner of an overflowing unit must do next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverflowAction {
    /// Do not render the unit, and export no further siblings.
    Stop,
    /// Render the unit clipped to the given box, then finish the model.
    RenderAndFinish(Rect),
    /// Render the unit clipped to the given box and go on with the next unit.
    RenderAndContinue(Rect),
    /// Do not render the unit; its space is reserved and it is re-exported on the next pass.
    Retry(Rect),
}

impl OverflowAction {
    /// The box the unit should be rendered into, if it is rendered at all.
    pub fn render_box(&self) -> Option<Rect> {
        match self {
            OverflowAction::RenderAndFinish(rect) | OverflowAction::RenderAndContinue(rect) => {
                Some(*rect)
            }
            OverflowAction::Stop | OverflowAction::Retry(_) => None,
        }
    }
}

impl Layout {
    /// Applies `policy` to a vertically overflowing placement.
    ///
    /// Overflow is a normal outcome, never an error.
    pub fn resolve_overflow(
        &mut self,
        id: ModelId,
        placement: &Placement,
        policy: OverflowPolicy,
    ) -> OverflowAction {
        log::debug!(
            "Layout {}: {} overflows at {:?}, applying {}",
            self.owner(),
            id,
            placement.bbox,
            policy.as_str()
        );
        match policy {
            OverflowPolicy::Stop => OverflowAction::Stop,
            OverflowPolicy::Finish => {
                let clipped = placement.bbox.clip_to(self.max_right_bottom());
                self.allocate(clipped);
                OverflowAction::RenderAndFinish(clipped)
            }
            OverflowPolicy::Continue => {
                let clipped = placement.bbox.clip_to(self.max_right_bottom());
                self.allocate(clipped);
                OverflowAction::RenderAndContinue(clipped)
            }
            OverflowPolicy::Retry => OverflowAction::Retry(self.reserve(id, placement.bbox)),
        }
    }
}
