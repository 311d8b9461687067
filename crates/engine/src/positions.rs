//! Anchor enumeration and pointer snapping.

use blockgrid_core::{Board, Point, Position, Shape};
use smallvec::SmallVec;

use crate::config::SnapConfig;
use crate::placement::can_place;

/// Inline capacity covers the 1x1 case on an 8x8 board
pub type PositionList = SmallVec<[Position; 64]>;

/// Every anchor where `shape` fits, row-major.
pub fn find_all_valid_positions(board: &Board, shape: &Shape) -> PositionList {
    let mut out = PositionList::new();
    let Some((max_x, max_y)) = anchor_range(board, shape) else {
        return out;
    };
    for y in 0..=max_y {
        for x in 0..=max_x {
            let pos = Position::new(x, y);
            if can_place(board, shape, pos) {
                out.push(pos);
            }
        }
    }
    out
}

/// Early-exit variant of `find_all_valid_positions`
pub fn has_valid_position(board: &Board, shape: &Shape) -> bool {
    let Some((max_x, max_y)) = anchor_range(board, shape) else {
        return false;
    };
    (0..=max_y).any(|y| (0..=max_x).any(|x| can_place(board, shape, Position::new(x, y))))
}

pub fn count_valid_positions(board: &Board, shape: &Shape) -> usize {
    let Some((max_x, max_y)) = anchor_range(board, shape) else {
        return 0;
    };
    (0..=max_y)
        .flat_map(|y| (0..=max_x).map(move |x| Position::new(x, y)))
        .filter(|&pos| can_place(board, shape, pos))
        .count()
}

// Largest anchor coordinates, None when the shape is bigger than the board
#[inline]
fn anchor_range(board: &Board, shape: &Shape) -> Option<(i32, i32)> {
    let max_x = board.width().checked_sub(shape.width())?;
    let max_y = board.height().checked_sub(shape.height())?;
    Some((max_x as i32, max_y as i32))
}

/// Snap a pointer to a valid anchor with two-tier hysteresis.
///
/// The nearest valid anchor wins when it is within `snap_distance` of the
/// pointer. Otherwise the previous snap is kept while it is still valid and
/// within `sticky_distance`. Otherwise nothing is highlighted. Ties on
/// distance resolve to the earlier anchor in `valid`.
pub fn find_nearest_valid_position(
    valid: &[Position],
    target: Point,
    last: Option<Position>,
    config: &SnapConfig,
) -> Option<Position> {
    let mut nearest: Option<(Position, f32)> = None;
    for &pos in valid {
        let dist = pos.distance_to(target);
        match nearest {
            Some((_, best)) if dist >= best => {}
            _ => nearest = Some((pos, dist)),
        }
    }

    if let Some((pos, dist)) = nearest {
        if dist <= config.snap_distance {
            return Some(pos);
        }
    }

    last.filter(|prev| {
        valid.contains(prev) && prev.distance_to(target) <= config.sticky_distance
    })
}
