use uuid::Uuid;

use super::*;
use crate::doc::Token;

fn v(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

fn grid() -> GridSpec {
    GridSpec::new(70.0, 1)
}

fn dragging(offset: Vector) -> TokenDrag {
    let mut drag = TokenDrag::new();
    drag.begin(Vector::ZERO);
    drag.update(offset, 1.0);
    drag
}

// =============================================================
// Offset tracking
// =============================================================

#[test]
fn new_drag_is_idle_with_zero_offset() {
    let drag = TokenDrag::new();
    assert!(!drag.is_active());
    assert_eq!(drag.offset(), Vector::ZERO);
}

#[test]
fn update_without_begin_is_ignored() {
    let mut drag = TokenDrag::new();
    assert!(!drag.update(v(10.0, 10.0), 1.0));
    assert_eq!(drag.offset(), Vector::ZERO);
}

#[test]
fn offset_is_screen_delta_divided_by_scale() {
    let mut drag = TokenDrag::new();
    drag.begin(v(100.0, 100.0));
    assert!(drag.update(v(140.0, 80.0), 2.0));
    assert_eq!(drag.offset(), v(20.0, -10.0));
}

#[test]
fn offset_is_cumulative_from_origin() {
    let mut drag = TokenDrag::new();
    drag.begin(v(0.0, 0.0));
    drag.update(v(10.0, 0.0), 1.0);
    drag.update(v(25.0, 5.0), 1.0);
    assert_eq!(drag.offset(), v(25.0, 5.0));
}

#[test]
fn update_to_same_point_reports_no_change() {
    let mut drag = TokenDrag::new();
    drag.begin(v(0.0, 0.0));
    assert!(drag.update(v(5.0, 5.0), 1.0));
    assert!(!drag.update(v(5.0, 5.0), 1.0));
}

#[test]
fn update_with_zero_scale_is_rejected() {
    let mut drag = TokenDrag::new();
    drag.begin(v(0.0, 0.0));
    assert!(!drag.update(v(5.0, 5.0), 0.0));
    assert_eq!(drag.offset(), Vector::ZERO);
}

#[test]
fn begin_discards_previous_offset() {
    let mut drag = dragging(v(30.0, 30.0));
    drag.begin(v(1.0, 1.0));
    assert_eq!(drag.offset(), Vector::ZERO);
}

// =============================================================
// Preview and commit positions
// =============================================================

#[test]
fn preview_snaps_base_then_adds_offset() {
    let drag = dragging(v(40.0, 5.0));
    assert_eq!(drag.preview_position(v(64.0, 10.0), &grid()), v(110.0, 5.0));
}

#[test]
fn commit_position_snaps_after_adding_offset() {
    let drag = dragging(v(40.0, 5.0));
    assert_eq!(drag.committed_position(v(64.0, 10.0), &grid()), v(70.0, 0.0));
}

#[test]
fn idle_preview_is_snapped_position() {
    let drag = TokenDrag::new();
    assert_eq!(drag.preview_position(v(64.0, 10.0), &grid()), v(70.0, 0.0));
}

#[test]
fn subdivided_grid_snaps_to_sub_cells() {
    let drag = dragging(v(20.0, 0.0));
    let fine = GridSpec::new(70.0, 2);
    assert_eq!(drag.committed_position(v(0.0, 0.0), &fine), v(35.0, 0.0));
}

#[test]
fn distance_counts_manhattan_cells() {
    let drag = dragging(v(140.0, -70.0));
    assert_eq!(drag.distance_cells(v(0.0, 0.0), &grid()), 3);
}

#[test]
fn distance_is_zero_inside_same_cell() {
    let drag = dragging(v(20.0, 20.0));
    assert_eq!(drag.distance_cells(v(0.0, 0.0), &grid()), 0);
}

// =============================================================
// Commit
// =============================================================

#[test]
fn commit_moves_every_key_and_resets_offset() {
    let a = Token::character(Uuid::new_v4(), (64.0, 10.0));
    let b = Token::character(Uuid::new_v4(), (140.0, 140.0));
    let mut doc = TokenDoc::new();
    doc.insert(a.clone());
    doc.insert(b.clone());

    let mut drag = dragging(v(40.0, 5.0));
    let batch = drag.commit([a.key, b.key], &mut doc, &grid());

    assert_eq!(batch.len(), 2);
    assert_eq!(doc.get(&a.key).unwrap().position, v(70.0, 0.0));
    assert_eq!(doc.get(&b.key).unwrap().position, v(210.0, 140.0));
    assert!(!drag.is_active());
    assert_eq!(drag.offset(), Vector::ZERO);
}

#[test]
fn commit_skips_keys_missing_from_doc() {
    let a = Token::character(Uuid::new_v4(), (0.0, 0.0));
    let mut doc = TokenDoc::new();
    doc.insert(a.clone());

    let mut drag = dragging(v(70.0, 0.0));
    let batch = drag.commit([a.key, Uuid::new_v4()], &mut doc, &grid());
    assert_eq!(batch, vec![(a.key, v(70.0, 0.0))]);
}

#[test]
fn zero_movement_commit_is_idempotent() {
    let a = Token::character(Uuid::new_v4(), (70.0, 0.0));
    let mut doc = TokenDoc::new();
    doc.insert(a.clone());

    let mut drag = dragging(Vector::ZERO);
    let batch = drag.commit([a.key], &mut doc, &grid());
    assert_eq!(batch, vec![(a.key, v(70.0, 0.0))]);
    assert_eq!(doc.get(&a.key).unwrap().position, v(70.0, 0.0));
}

#[test]
fn committed_token_renders_where_it_landed() {
    let a = Token::character(Uuid::new_v4(), (64.0, 10.0));
    let mut doc = TokenDoc::new();
    doc.insert(a.clone());

    let mut drag = dragging(v(40.0, 5.0));
    drag.commit([a.key], &mut doc, &grid());
    let landed = doc.get(&a.key).unwrap().position;
    assert_eq!(drag.preview_position(landed, &grid()), v(70.0, 0.0));
}

#[test]
fn area_tokens_follow_the_same_commit_path() {
    let zone = Token::area(Uuid::new_v4(), (0.0, 0.0), (140.0, 70.0));
    let mut doc = TokenDoc::new();
    doc.insert(zone.clone());

    let mut drag = dragging(v(75.0, 80.0));
    drag.commit([zone.key], &mut doc, &grid());
    assert_eq!(doc.get(&zone.key).unwrap().position, v(70.0, 70.0));
}

#[test]
fn reset_drops_gesture_without_commit() {
    let mut drag = dragging(v(10.0, 10.0));
    drag.reset();
    assert!(!drag.is_active());
    assert_eq!(drag.offset(), Vector::ZERO);
}
