use crate::types::geo::{Coordinate, LengthTable, Route};
use crate::types::progress::Progress;

/// Segment that holds a distance offset, and how far into it the offset falls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentPosition {
    pub index: usize,
    pub fraction: f64,
}

/// Finds the segment `i` whose cumulative span contains `total * progress`.
///
/// Offsets at or past the end (including float overshoot) resolve to the
/// end of the last segment. Zero-length segments never hold an offset.
pub fn locate(table: &LengthTable, progress: Progress) -> SegmentPosition {
    let Some(last_index) = table.lengths.len().checked_sub(1) else {
        return SegmentPosition {
            index: 0,
            fraction: 0.0,
        };
    };
    let end = SegmentPosition {
        index: last_index,
        fraction: 1.0,
    };
    if table.total <= f64::EPSILON {
        return SegmentPosition {
            index: 0,
            fraction: 0.0,
        };
    }
    if progress >= Progress::END {
        return end;
    }

    let target = table.total * progress.fraction();
    let mut traveled = 0.0;
    for (index, length) in table.lengths.iter().copied().enumerate() {
        let next_traveled = traveled + length;
        if next_traveled > target {
            let fraction = if length > f64::EPSILON {
                ((target - traveled) / length).clamp(0.0, 1.0)
            } else {
                1.0
            };
            return SegmentPosition { index, fraction };
        }
        traveled = next_traveled;
    }
    end
}

/// Coordinate lying `progress` of the way along the route.
pub fn interpolate(route: &Route, table: &LengthTable, progress: Progress) -> Coordinate {
    if route.len() < 2 || table.lengths.len() != route.len() - 1 {
        return route.first();
    }
    if progress <= Progress::START || table.total <= f64::EPSILON {
        return route.first();
    }
    if progress >= Progress::END {
        return route.last();
    }

    let position = locate(table, progress);
    let from = route[position.index];
    let to = route[position.index + 1];
    if position.fraction >= 1.0 {
        return to;
    }
    from.lerp(to, position.fraction)
}

/// Route points at or beyond the distance offset for `progress`.
///
/// Truncation happens at point granularity: the first returned point is the
/// first vertex whose cumulative distance reaches the offset, not an
/// interpolated one.
pub fn remaining_route<'a>(
    route: &'a Route,
    table: &LengthTable,
    progress: Progress,
) -> &'a [Coordinate] {
    if progress >= Progress::END {
        return &route[route.len() - 1..];
    }

    let start_distance = table.total * progress.fraction();
    let segment_count = table.lengths.len().min(route.len().saturating_sub(1));

    let mut index = 0;
    let mut traveled = 0.0;
    while index < segment_count && traveled < start_distance {
        traveled += table.lengths[index];
        index += 1;
    }

    &route[index..]
}
