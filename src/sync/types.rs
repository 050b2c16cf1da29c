//! Sync type definitions
//!
//! The board snapshot handed to renderers and the player notifications that
//! drive a session.

use crate::events::{ArrowEvent, MoveEvent};
use serde::Serialize;

/// Everything the board shows at one playback time
///
/// # Fields
/// - `time`: Playback time (seconds) this snapshot was computed for
/// - `fen`: Active board position, passed to the renderer verbatim
/// - `last_move`: The move that produced `fen`, if the position came from a move
/// - `move_index`: Index of `last_move` in the sorted move list
/// - `highlights`: Active highlighted squares, de-duplicated, in start order
/// - `arrows`: Active arrows in start order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub time: f64,
    pub fen: String,
    pub last_move: Option<MoveEvent>,
    pub move_index: Option<usize>,
    pub highlights: Vec<String>,
    pub arrows: Vec<ArrowEvent>,
}

impl BoardSnapshot {
    /// Snapshot for an empty timeline at time zero
    pub fn initial(fen: &str) -> Self {
        Self {
            time: 0.0,
            fen: fen.to_string(),
            last_move: None,
            move_index: None,
            highlights: Vec::new(),
            arrows: Vec::new(),
        }
    }
}

/// Playback transitions reported by a video source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerEvent {
    Unstarted,
    Playing,
    Paused,
    Ended,
    RateChanged,
}

/// A playback transition and the playhead position at the moment it happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerNotification {
    pub event: PlayerEvent,
    pub time: f64,
}

impl PlayerNotification {
    pub fn new(event: PlayerEvent, time: f64) -> Self {
        Self { event, time }
    }
}
