//! Temporal queries
//!
//! Pure lookups over sequences already sorted by [`categorize_events`](super::categorize_events).
//! These run on every time tick, so the instant-event lookups are binary searches.

use crate::events::{Annotation, MoveEvent, PositionEvent};

/// Index of the latest move with `timestamp <= time`.
///
/// Returns `None` when `moves` is empty or `time` precedes the first move.
/// A move exactly at `time` counts as reached. O(log n).
pub fn latest_move_index(moves: &[MoveEvent], time: f64) -> Option<usize> {
    // Number of moves at or before `time`; the predicate is monotone on a sorted slice.
    let reached = moves.partition_point(|m| m.timestamp <= time);
    reached.checked_sub(1)
}

/// Latest position event with `timestamp <= time`, if any.
///
/// Same search and edge cases as [`latest_move_index`].
pub fn latest_position(positions: &[PositionEvent], time: f64) -> Option<&PositionEvent> {
    let reached = positions.partition_point(|p| p.timestamp <= time);
    reached.checked_sub(1).map(|i| &positions[i])
}

/// Annotations active at `time` (`start <= time < end`), in input order.
///
/// A linear scan; lessons have few enough annotations that an interval tree
/// would not pay for itself.
pub fn active_annotations<A: Annotation>(annotations: &[A], time: f64) -> Vec<&A> {
    annotations.iter().filter(|a| a.is_active_at(time)).collect()
}
