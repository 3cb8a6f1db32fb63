#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Vector, b: Vector) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn pt(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

fn viewport(offset: (f64, f64), tick: i32) -> Viewport {
    Viewport::with_state(ZoomSettings::default(), offset, tick)
}

// --- Defaults ---

#[test]
fn default_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.offset, Vector::ZERO);
    assert_eq!(vp.scale_tick(), 0);
    assert_eq!(vp.scale(), 1.0);
    assert_eq!(vp.world_to_screen(pt(12.0, 34.0)), pt(12.0, 34.0));
}

#[test]
fn with_state_clamps_tick() {
    assert_eq!(viewport((0.0, 0.0), 99).scale_tick(), 10);
    assert_eq!(viewport((0.0, 0.0), -99).scale_tick(), -10);
}

#[test]
fn scale_is_power_of_tick() {
    let vp = viewport((0.0, 0.0), 2);
    assert!(approx_eq(vp.scale(), 1.3 * 1.3));
}

// --- Conversions ---

#[test]
fn world_to_screen_applies_scale_then_offset() {
    let vp = Viewport::with_state(ZoomSettings { base: 2.0, ..ZoomSettings::default() }, (10.0, 20.0), 1);
    assert_eq!(vp.world_to_screen(pt(5.0, 5.0)), pt(20.0, 30.0));
}

#[test]
fn screen_to_world_inverts_offset_then_scale() {
    let vp = Viewport::with_state(ZoomSettings { base: 2.0, ..ZoomSettings::default() }, (10.0, 20.0), 1);
    assert_eq!(vp.screen_to_world(pt(20.0, 30.0)), pt(5.0, 5.0));
}

#[test]
fn round_trip_for_many_states() {
    for tick in -10..=10 {
        for (ox, oy) in [(0.0, 0.0), (100.0, -40.0), (-333.3, 12.5)] {
            let vp = viewport((ox, oy), tick);
            for (x, y) in [(0.0, 0.0), (1.5, -2.5), (700.0, 1400.0), (-90.0, 35.0)] {
                let p = pt(x, y);
                let back = vp.screen_to_world(vp.world_to_screen(p));
                assert!((back - p).magnitude() < 1e-6, "tick={tick} p={p} back={back}");
            }
        }
    }
}

#[test]
fn screen_delta_ignores_offset() {
    let vp = Viewport::with_state(ZoomSettings { base: 2.0, ..ZoomSettings::default() }, (500.0, 500.0), 2);
    assert_eq!(vp.screen_delta_to_world(pt(40.0, -8.0)), pt(10.0, -2.0));
}

#[test]
fn world_rect_to_screen_maps_corners() {
    let vp = Viewport::with_state(ZoomSettings { base: 2.0, ..ZoomSettings::default() }, (1.0, 1.0), 1);
    let r = vp.world_rect_to_screen(&Rect::from_ltrb(0.0, 0.0, 10.0, 5.0));
    assert_eq!(r.top_left(), pt(1.0, 1.0));
    assert_eq!(r.bottom_right(), pt(21.0, 11.0));
}

// --- move ---

#[test]
fn move_by_accumulates_without_bounds() {
    let mut vp = Viewport::default();
    vp.move_by(pt(1e9, -1e9));
    vp.move_by(pt(1.0, 1.0));
    assert_eq!(vp.offset, pt(1e9 + 1.0, -1e9 + 1.0));
}

// --- zoom ---

#[test]
fn zoom_in_at_pivot_example() {
    let mut vp = viewport((100.0, 100.0), 0);
    let pivot = pt(200.0, 200.0);
    let before = vp.screen_to_world(pivot);
    assert!(vp.zoom(1.0, pivot));
    assert_eq!(vp.scale_tick(), 1);
    assert!(approx_eq(vp.scale(), 1.3));
    assert!(point_approx_eq(vp.offset, pt(70.0, 70.0)));
    assert!(point_approx_eq(vp.screen_to_world(pivot), before));
}

#[test]
fn zoom_keeps_pivot_world_point_fixed() {
    for start_tick in -9..=9 {
        for direction in [1.0, -1.0, 3.5, -0.01] {
            let mut vp = viewport((37.0, -12.0), start_tick);
            let pivot = pt(412.0, 95.5);
            let before = vp.screen_to_world(pivot);
            vp.zoom(direction, pivot);
            let after = vp.screen_to_world(pivot);
            assert!((after - before).magnitude() < 1e-6, "tick={start_tick} dir={direction}");
        }
    }
}

#[test]
fn zoom_uses_only_sign_of_direction() {
    let mut vp = Viewport::default();
    vp.zoom(120.0, Vector::ZERO);
    assert_eq!(vp.scale_tick(), 1);
    vp.zoom(-0.5, Vector::ZERO);
    assert_eq!(vp.scale_tick(), 0);
}

#[test]
fn zoom_zero_direction_is_noop() {
    let mut vp = viewport((5.0, 5.0), 3);
    assert!(!vp.zoom(0.0, pt(100.0, 100.0)));
    assert!(!vp.zoom(f64::NAN, pt(100.0, 100.0)));
    assert_eq!(vp.offset, pt(5.0, 5.0));
    assert_eq!(vp.scale_tick(), 3);
}

#[test]
fn zoom_clamps_at_ceiling_without_moving_offset() {
    let mut vp = Viewport::default();
    for _ in 0..50 {
        vp.zoom(1.0, pt(300.0, 200.0));
    }
    assert_eq!(vp.scale_tick(), 10);
    let offset = vp.offset;
    assert!(!vp.zoom(1.0, pt(10.0, 10.0)));
    assert_eq!(vp.offset, offset);
}

#[test]
fn zoom_clamps_at_floor() {
    let mut vp = Viewport::default();
    for _ in 0..50 {
        vp.zoom(-1.0, pt(300.0, 200.0));
    }
    assert_eq!(vp.scale_tick(), -10);
}

#[test]
fn zoom_in_then_out_restores_scale_exactly() {
    let mut vp = viewport((0.0, 0.0), 0);
    for _ in 0..4 {
        vp.zoom(1.0, pt(50.0, 50.0));
    }
    for _ in 0..4 {
        vp.zoom(-1.0, pt(50.0, 50.0));
    }
    assert_eq!(vp.scale_tick(), 0);
    assert_eq!(vp.scale(), 1.0);
}

#[test]
fn reset_restores_origin_and_tick() {
    let mut vp = viewport((40.0, 40.0), 5);
    vp.reset();
    assert_eq!(vp.offset, Vector::ZERO);
    assert_eq!(vp.scale_tick(), 0);
}

// --- transform ---

#[test]
fn transform_css_string() {
    let vp = Viewport::with_state(ZoomSettings { base: 2.0, ..ZoomSettings::default() }, (10.0, -5.0), 1);
    let t = vp.transform();
    assert_eq!(t.translate, pt(10.0, -5.0));
    assert_eq!(t.scale, 2.0);
    assert_eq!(t.css(), "translate(10px, -5px) scale(2)");
}
