//! Snapshot resolution
//!
//! Combines the timeline queries into the board state for one playback time.

use super::types::BoardSnapshot;
use crate::timeline::{active_annotations, latest_move_index, latest_position, Timeline};

/// Compute the board state at `time`.
///
/// # Resolution Policy
/// 1. If any move is at or before `time`, the latest one wins: its `fen` is
///    shown and it becomes the last move.
/// 2. Otherwise the latest position event at or before `time` is shown.
/// 3. Otherwise `initial_fen` is shown.
///
/// Moves and positions are not compared with each other by timestamp: a move
/// at 1.0 still outranks a position at 3.0 when `time` is 4.0. Lessons that
/// reset the board mid-way with a position event therefore need a move-free
/// timeline up to that point.
///
/// Pure: the same `(timeline, time, initial_fen)` always gives an equal snapshot.
pub fn resolve_snapshot(timeline: &Timeline, time: f64, initial_fen: &str) -> BoardSnapshot {
    let move_index = latest_move_index(&timeline.moves, time);

    let (fen, last_move) = match move_index {
        Some(index) => {
            let latest = &timeline.moves[index];
            (latest.fen.clone(), Some(latest.clone()))
        }
        None => match latest_position(&timeline.positions, time) {
            Some(position) => (position.fen.clone(), None),
            None => (initial_fen.to_string(), None),
        },
    };

    let mut highlights: Vec<String> = Vec::new();
    for highlight in active_annotations(&timeline.highlights, time) {
        if !highlights.contains(&highlight.square) {
            highlights.push(highlight.square.clone());
        }
    }

    let arrows = active_annotations(&timeline.arrows, time)
        .into_iter()
        .cloned()
        .collect();

    BoardSnapshot {
        time,
        fen,
        last_move,
        move_index,
        highlights,
        arrows,
    }
}
