use crate::{Fit, Layout, LayoutError, LayoutStack, OverflowAction};
use tabulate_style::OverflowPolicy;
use tabulate_types::{ModelId, Orientation, Position, Rect, Size};

fn id(n: u64) -> ModelId {
    ModelId::new(n)
}

fn measured_layout(orientation: Orientation, bounds: Rect, sizes: &[(u64, Size)]) -> Layout {
    let mut layout = Layout::new(id(0), bounds, orientation);
    for (n, size) in sizes {
        layout.record_measure(id(*n), *size);
    }
    layout
}

#[test]
fn test_vertical_flow_stacks_children() {
    let mut layout = measured_layout(
        Orientation::Vertical,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        &[(1, Size::new(50.0, 30.0)), (2, Size::new(80.0, 30.0))],
    );

    let first = layout.place(id(1)).unwrap();
    let second = layout.place(id(2)).unwrap();

    assert_eq!(first.bbox, Rect::new(0.0, 0.0, 50.0, 30.0));
    assert_eq!(second.bbox, Rect::new(0.0, 30.0, 80.0, 30.0));
    assert_eq!(layout.cursor(), Position::new(0.0, 60.0));
    assert_eq!(layout.used_rect(), Rect::new(0.0, 0.0, 80.0, 60.0));
}

#[test]
fn test_horizontal_overflow_wraps_instead_of_paginating() {
    let mut layout = measured_layout(
        Orientation::Horizontal,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        &[
            (1, Size::new(40.0, 20.0)),
            (2, Size::new(40.0, 25.0)),
            (3, Size::new(40.0, 20.0)),
        ],
    );

    let first = layout.place(id(1)).unwrap();
    let second = layout.place(id(2)).unwrap();
    let third = layout.place(id(3)).unwrap();

    assert_eq!(first.fit, Fit::Fits);
    assert_eq!(second.fit, Fit::Fits);
    assert_eq!(second.bbox.x, 40.0);
    assert_eq!(
        third.fit,
        Fit::HorizontalOverflow,
        "third child must wrap, not trigger a vertical overflow policy"
    );
    assert_eq!(
        third.bbox,
        Rect::new(0.0, 25.0, 40.0, 20.0),
        "x resets and y moves below the tallest child of the first line"
    );
}

#[test]
fn test_first_child_on_line_never_wraps() {
    let mut layout = measured_layout(
        Orientation::Horizontal,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        &[(1, Size::new(140.0, 20.0))],
    );
    let placement = layout.place(id(1)).unwrap();
    assert_eq!(placement.fit, Fit::Fits);
}

#[test]
fn test_place_without_measure_is_contract_violation() {
    let mut layout = Layout::new(id(0), Rect::new(0.0, 0.0, 10.0, 10.0), Orientation::Vertical);
    match layout.place(id(9)) {
        Err(LayoutError::NotMeasured(missing)) => assert_eq!(missing, id(9)),
        other => panic!("expected NotMeasured, got {:?}", other),
    }
}

#[test]
fn test_measure_with_caches_per_layout() {
    let mut layout = Layout::new(id(0), Rect::new(0.0, 0.0, 10.0, 10.0), Orientation::Vertical);
    let mut calls = 0;
    for _ in 0..3 {
        let size: Result<Size, LayoutError> = layout.measure_with(id(1), |_| {
            calls += 1;
            Ok(Size::new(5.0, 5.0))
        });
        assert_eq!(size.unwrap(), Size::new(5.0, 5.0));
    }
    assert_eq!(calls, 1);
}

#[test]
fn test_vertical_overflow_is_not_allocated_until_resolved() {
    let mut layout = measured_layout(
        Orientation::Vertical,
        Rect::new(0.0, 0.0, 100.0, 50.0),
        &[(1, Size::new(100.0, 80.0))],
    );
    let placement = layout.place(id(1)).unwrap();
    assert_eq!(placement.fit, Fit::VerticalOverflow);
    assert!(layout.is_empty());

    assert_eq!(
        layout.resolve_overflow(id(1), &placement, OverflowPolicy::Stop),
        OverflowAction::Stop
    );
    assert!(layout.is_empty(), "STOP allocates nothing");
}

#[test]
fn test_finish_and_continue_render_clipped() {
    for policy in [OverflowPolicy::Finish, OverflowPolicy::Continue] {
        let mut layout = measured_layout(
            Orientation::Vertical,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            &[(1, Size::new(100.0, 80.0))],
        );
        let placement = layout.place(id(1)).unwrap();
        let action = layout.resolve_overflow(id(1), &placement, policy);
        assert_eq!(action.render_box(), Some(Rect::new(0.0, 0.0, 100.0, 50.0)));
        assert_eq!(layout.available_size().height, 0.0);
    }
}

#[test]
fn test_retry_reservation_is_idempotent() {
    let bounds = Rect::new(0.0, 10.0, 100.0, 50.0);
    let mut layout = measured_layout(
        Orientation::Vertical,
        bounds,
        &[(1, Size::new(60.0, 20.0)), (2, Size::new(100.0, 80.0))],
    );
    layout.place(id(1)).unwrap();

    let mut reservations = Vec::new();
    for _ in 0..3 {
        let placement = layout.place(id(2)).unwrap();
        match layout.resolve_overflow(id(2), &placement, OverflowPolicy::Retry) {
            OverflowAction::Retry(reserved) => reservations.push(reserved),
            other => panic!("expected Retry, got {:?}", other),
        }
    }

    let expected = Rect::new(0.0, 30.0, 100.0, 30.0);
    assert!(reservations.iter().all(|r| *r == expected), "{:?}", reservations);
    assert_eq!(layout.reservation(id(2)), Some(expected));
    assert_eq!(layout.used_rect(), Rect::new(0.0, 10.0, 100.0, 50.0));

    // A fresh pass over an identical layout converges to the same box.
    let mut next_pass = measured_layout(
        Orientation::Vertical,
        bounds,
        &[(1, Size::new(60.0, 20.0)), (2, Size::new(100.0, 80.0))],
    );
    next_pass.place(id(1)).unwrap();
    let placement = next_pass.place(id(2)).unwrap();
    assert_eq!(
        next_pass.resolve_overflow(id(2), &placement, OverflowPolicy::Retry),
        OverflowAction::Retry(expected)
    );
}

#[test]
fn test_stack_child_scope_bounds_and_absorb() {
    let mut stack = LayoutStack::new(Rect::new(0.0, 0.0, 200.0, 300.0));
    stack.open(id(1), Orientation::Vertical, None);
    {
        let parent = stack.current_mut().unwrap();
        parent.allocate(Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    let child = stack.open(id(2), Orientation::Horizontal, None);
    assert_eq!(child.bounds(), Rect::new(0.0, 100.0, 200.0, 200.0));
    child.allocate(Rect::new(0.0, 100.0, 50.0, 40.0));

    let closed = stack.close().unwrap();
    assert_eq!(closed.owner(), id(2));
    assert_eq!(stack.current().unwrap().cursor(), Position::new(0.0, 140.0));
}

#[test]
fn test_stack_resume_and_reset() {
    let mut stack = LayoutStack::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    stack.open(id(1), Orientation::Vertical, None);
    stack.suspend(id(3));
    stack.suspend(id(2));
    stack.suspend(id(3));

    assert_eq!(stack.resume_suspended(), vec![id(2), id(3)]);
    assert!(stack.resume_suspended().is_empty(), "resuming drains the set");

    stack.reset_layouts(Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(stack.depth(), 0);
    assert!(matches!(stack.current(), Err(LayoutError::NoActiveLayout)));
    assert_eq!(stack.root(), Rect::new(0.0, 0.0, 50.0, 50.0));
}
