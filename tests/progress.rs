use driveviz_rs::pipeline::progress::{interpolate, locate, remaining_route};
use driveviz_rs::types::geo::{Coordinate, LengthTable, Route};
use driveviz_rs::types::progress::Progress;
use proptest::prelude::*;

fn route(points: &[(f64, f64)]) -> Route {
    Route::new(points.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)).collect())
        .expect("non-empty route")
}

fn assert_close(actual: Coordinate, expected: (f64, f64)) {
    assert!(
        (actual.lat - expected.0).abs() < 1e-9 && (actual.lon - expected.1).abs() < 1e-9,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn straight_line() -> (Route, LengthTable) {
    let route = route(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]);
    let table = LengthTable::from_points(&route);
    (route, table)
}

#[test]
fn progress_clamps_and_converts_percent() {
    assert_eq!(Progress::new(-0.5), Progress::START);
    assert_eq!(Progress::new(7.0), Progress::END);
    assert_eq!(Progress::new(f64::NAN), Progress::START);
    assert_eq!(Progress::from_percent(25.0).fraction(), 0.25);
    assert_eq!(Progress::new(0.5).percent(), 50.0);
}

#[test]
fn interpolate_start_and_end() {
    let (route, table) = straight_line();
    assert_close(interpolate(&route, &table, Progress::START), (0.0, 0.0));
    assert_close(interpolate(&route, &table, Progress::END), (0.0, 2.0));
}

#[test]
fn interpolate_midpoints() {
    let (route, table) = straight_line();
    assert_close(interpolate(&route, &table, Progress::new(0.5)), (0.0, 1.0));
    assert_close(interpolate(&route, &table, Progress::new(0.25)), (0.0, 0.5));
    assert_close(interpolate(&route, &table, Progress::from_percent(75.0)), (0.0, 1.5));
}

#[test]
fn interpolate_single_point_route() {
    let route = route(&[(10.0, 20.0)]);
    let table = LengthTable::from_points(&route);
    assert_close(interpolate(&route, &table, Progress::new(0.6)), (10.0, 20.0));
}

#[test]
fn interpolate_all_duplicate_points() {
    let route = route(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
    let table = LengthTable::from_points(&route);
    assert_close(interpolate(&route, &table, Progress::new(0.5)), (1.0, 1.0));
    assert_close(interpolate(&route, &table, Progress::END), (1.0, 1.0));
}

#[test]
fn interpolate_skips_zero_length_segment() {
    let leading = route(&[(0.0, 0.0), (0.0, 0.0), (0.0, 1.0)]);
    let table = LengthTable::from_points(&leading);
    assert_close(interpolate(&leading, &table, Progress::new(0.5)), (0.0, 0.5));
    assert_eq!(locate(&table, Progress::new(0.5)).index, 1);

    let trailing = route(&[(0.0, 0.0), (0.0, 1.0), (0.0, 1.0)]);
    let table = LengthTable::from_points(&trailing);
    assert_close(interpolate(&trailing, &table, Progress::new(0.999_999)), (0.0, 0.999_999));
    assert_close(interpolate(&trailing, &table, Progress::END), (0.0, 1.0));
}

#[test]
fn locate_end_is_last_segment() {
    let (_, table) = straight_line();
    let position = locate(&table, Progress::END);
    assert_eq!(position.index, 1);
    assert_eq!(position.fraction, 1.0);
}

#[test]
fn remaining_route_at_start_is_full_route() {
    let (route, table) = straight_line();
    assert_eq!(remaining_route(&route, &table, Progress::START), route.points());
}

#[test]
fn remaining_route_at_end_is_last_point() {
    let (route, table) = straight_line();
    let rest = remaining_route(&route, &table, Progress::END);
    assert_eq!(rest, &[Coordinate::new(0.0, 2.0)]);
}

#[test]
fn remaining_route_truncates_at_vertices() {
    let (route, table) = straight_line();
    // Halfway is exactly the middle vertex.
    assert_eq!(
        remaining_route(&route, &table, Progress::new(0.5)),
        &route[1..]
    );
    // Just past it, the next whole vertex starts the remainder.
    assert_eq!(
        remaining_route(&route, &table, Progress::new(0.6)),
        &route[2..]
    );
}

#[test]
fn remaining_route_single_point() {
    let route = route(&[(5.0, 5.0)]);
    let table = LengthTable::from_points(&route);
    assert_eq!(remaining_route(&route, &table, Progress::new(0.5)).len(), 1);
    assert_eq!(remaining_route(&route, &table, Progress::END).len(), 1);
}

proptest! {
    #[test]
    fn interpolation_never_moves_backward(
        points in prop::collection::vec((-60.0f64..60.0, -170.0f64..170.0), 2..30),
        fractions in prop::collection::vec(0.0f64..=1.0, 2..20),
    ) {
        let mut fractions = fractions;
        let route = route(&points);
        let table = LengthTable::from_points(&route);
        fractions.sort_by(|a, b| a.total_cmp(b));

        let mut last_index = 0;
        for fraction in fractions {
            let position = locate(&table, Progress::new(fraction));
            prop_assert!(position.index >= last_index);
            prop_assert!(position.index < table.lengths.len());
            last_index = position.index;

            let rest = remaining_route(&route, &table, Progress::new(fraction));
            prop_assert!(!rest.is_empty());
        }
    }
}
