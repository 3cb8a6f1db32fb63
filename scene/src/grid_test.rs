#![allow(clippy::float_cmp)]

use super::*;

fn v(x: f64, y: f64) -> Vector {
    Vector::new(x, y)
}

#[test]
fn default_grid_is_seventy_whole_cells() {
    let grid = GridSpec::default();
    assert_eq!(grid.cell_size, 70.0);
    assert_eq!(grid.subdivisions, 1);
    assert_eq!(grid.step(), 70.0);
}

#[test]
fn snap_to_whole_cells() {
    let grid = GridSpec::new(70.0, 1);
    assert_eq!(grid.snap(v(64.0, 10.0)), v(70.0, 0.0));
    assert_eq!(grid.snap(v(104.0, 15.0)), v(70.0, 0.0));
}

#[test]
fn snap_with_subdivisions_uses_finer_step() {
    let grid = GridSpec::new(70.0, 2);
    assert_eq!(grid.step(), 35.0);
    assert_eq!(grid.snap(v(50.0, 20.0)), v(35.0, 35.0));
}

#[test]
fn snap_is_idempotent() {
    for grid in [GridSpec::new(70.0, 1), GridSpec::new(50.0, 5), GridSpec::new(1.0, 1)] {
        for i in -30..30 {
            let p = v(f64::from(i) * 17.3, f64::from(i) * -8.1);
            let once = grid.snap(p);
            assert_eq!(grid.snap(once), once);
        }
    }
}

#[test]
fn invalid_cell_size_falls_back_to_default() {
    assert_eq!(GridSpec::new(0.0, 1).cell_size, 70.0);
    assert_eq!(GridSpec::new(-5.0, 1).cell_size, 70.0);
    assert_eq!(GridSpec::new(f64::NAN, 1).cell_size, 70.0);
}

#[test]
fn zero_subdivisions_treated_as_one() {
    let grid = GridSpec::new(40.0, 0);
    assert_eq!(grid.subdivisions, 1);
    assert_eq!(grid.step(), 40.0);
}

#[test]
fn cell_of_rounds_to_whole_cells() {
    let grid = GridSpec::new(70.0, 1);
    assert_eq!(grid.cell_of(v(140.0, -70.0)), v(2.0, -1.0));
    assert_eq!(grid.cell_of(v(20.0, -20.0)), v(0.0, 0.0));
}

#[test]
fn manhattan_counts_orthogonal_steps() {
    let grid = GridSpec::new(70.0, 1);
    assert_eq!(grid.manhattan_cells(v(0.0, 0.0), v(210.0, 140.0)), 5);
    assert_eq!(grid.manhattan_cells(v(210.0, 140.0), v(0.0, 0.0)), 5);
}

#[test]
fn manhattan_diagonal_is_not_euclidean() {
    let grid = GridSpec::new(10.0, 1);
    assert_eq!(grid.manhattan_cells(v(0.0, 0.0), v(30.0, 30.0)), 6);
}

#[test]
fn manhattan_snaps_both_ends_first() {
    let grid = GridSpec::new(70.0, 1);
    assert_eq!(grid.manhattan_cells(v(64.0, 10.0), v(104.0, 15.0)), 0);
    assert_eq!(grid.manhattan_cells(v(64.0, 10.0), v(110.0, 5.0)), 1);
}

#[test]
fn manhattan_with_subdivisions_counts_whole_cells() {
    let grid = GridSpec::new(70.0, 2);
    assert_eq!(grid.manhattan_cells(v(0.0, 0.0), v(140.0, 0.0)), 2);
}
