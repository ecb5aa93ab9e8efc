use std::time::{Duration, Instant};

use trimsync::selection::{DragEditor, Handle, Selection, DRAG_COALESCE};

fn invariant_holds(selection: &Selection) -> bool {
    0.0 <= selection.start()
        && selection.start() < selection.end()
        && selection.end() <= selection.duration()
}

#[test]
fn full_selection_covers_asset() {
    let selection = Selection::full(10.0);
    assert_eq!(selection.start(), 0.0);
    assert_eq!(selection.end(), 10.0);
    assert!(invariant_holds(&selection));
}

#[test]
fn inverted_range_is_rejected_and_prior_value_kept() {
    let mut selection = Selection::full(10.0);
    assert!(selection.set_range(3.0, 7.0));

    // start 2.0 after end 1.0 on a 10 s asset: rejected outright.
    assert!(!selection.set_range(2.0, 1.0));
    assert_eq!(selection.start(), 3.0);
    assert_eq!(selection.end(), 7.0);
    assert!(invariant_holds(&selection));
}

#[test]
fn start_clamps_below_zero_and_rejects_crossing_end() {
    let mut selection = Selection::full(10.0);
    assert!(selection.set_end(5.0));

    assert!(selection.set_start(-3.0));
    assert_eq!(selection.start(), 0.0);

    assert!(!selection.set_start(5.0));
    assert!(!selection.set_start(6.0));
    assert_eq!(selection.start(), 0.0);
    assert!(invariant_holds(&selection));
}

#[test]
fn end_clamps_above_duration_and_rejects_crossing_start() {
    let mut selection = Selection::full(10.0);
    assert!(selection.set_start(4.0));

    assert!(selection.set_end(25.0));
    assert_eq!(selection.end(), 10.0);

    assert!(!selection.set_end(4.0));
    assert!(!selection.set_end(1.0));
    assert_eq!(selection.end(), 10.0);
    assert!(invariant_holds(&selection));
}

#[test]
fn non_finite_input_is_rejected() {
    let mut selection = Selection::full(10.0);
    assert!(!selection.set_start(f64::NAN));
    assert!(!selection.set_end(f64::INFINITY));
    assert!(!selection.set_range(f64::NAN, 5.0));
    assert!(invariant_holds(&selection));
}

#[test]
fn invariant_survives_a_mutation_storm() {
    let mut selection = Selection::full(10.0);
    let probes = [-5.0, 0.0, 0.1, 4.9, 5.0, 9.9, 10.0, 15.0, f64::NAN];
    for (i, &a) in probes.iter().enumerate() {
        for &b in &probes {
            if i % 2 == 0 {
                selection.set_start(a);
                selection.set_end(b);
            } else {
                selection.set_range(a, b);
            }
            assert!(invariant_holds(&selection), "broken by ({a}, {b})");
        }
    }
}

#[test]
fn clamp_pins_time_into_range() {
    let mut selection = Selection::full(10.0);
    assert!(selection.set_range(2.0, 8.0));
    assert_eq!(selection.clamp(1.0), 2.0);
    assert_eq!(selection.clamp(9.0), 8.0);
    assert_eq!(selection.clamp(5.0), 5.0);
    assert!(selection.contains(2.0));
    assert!(selection.contains(8.0));
    assert!(!selection.contains(8.1));
}

#[test]
fn drag_preview_does_not_touch_committed_value() {
    let mut editor = DragEditor::new(Selection::full(10.0));
    editor.begin(Handle::Start);

    let t0 = Instant::now();
    assert!(editor.preview_at(t0, 3.0));
    assert_eq!(editor.visual().start(), 3.0);
    assert_eq!(editor.selection().start(), 0.0);

    editor.cancel();
    assert_eq!(editor.selection().start(), 0.0);
    assert_eq!(editor.visual().start(), 0.0);
}

#[test]
fn coalesced_drag_still_commits_final_value() {
    let mut editor = DragEditor::new(Selection::full(10.0));
    editor.begin(Handle::End);

    let t0 = Instant::now();
    assert!(editor.preview_at(t0, 9.0));
    // A burst of pointer events inside the coalescing window: no visual
    // refresh, but the values are not lost.
    assert!(!editor.preview_at(t0 + Duration::from_millis(4), 8.0));
    assert!(!editor.preview_at(t0 + Duration::from_millis(8), 6.0));
    assert_eq!(editor.visual().end(), 9.0);

    assert!(editor.commit());
    assert_eq!(editor.selection().end(), 6.0);
    assert!(!editor.is_dragging());
}

#[test]
fn preview_refreshes_after_coalesce_window() {
    let mut editor = DragEditor::new(Selection::full(10.0));
    editor.begin(Handle::End);

    let t0 = Instant::now();
    assert!(editor.preview_at(t0, 9.0));
    assert!(editor.preview_at(t0 + DRAG_COALESCE, 7.0));
    assert_eq!(editor.visual().end(), 7.0);
}

#[test]
fn commit_with_invalid_final_position_keeps_prior_selection() {
    let mut editor = DragEditor::new(Selection::full(10.0));
    assert!(editor.selection_mut().set_range(2.0, 8.0));

    editor.begin(Handle::Start);
    editor.preview_at(Instant::now(), 9.5);
    assert!(!editor.commit());
    assert_eq!(editor.selection().start(), 2.0);
    assert_eq!(editor.selection().end(), 8.0);
}

#[test]
fn commit_without_movement_changes_nothing() {
    let mut editor = DragEditor::new(Selection::full(10.0));
    editor.begin(Handle::Start);
    assert!(!editor.commit());
    assert_eq!(*editor.selection(), Selection::full(10.0));
}
