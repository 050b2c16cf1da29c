//! # Sync Module
//!
//! Keep a board in lock-step with a video's playback position.
//!
//! ## Purpose
//! A lesson video is narrated over a board. This module turns "the video is at
//! 12.4s" into "show this position, mark these squares, draw these arrows",
//! and pushes that to a [`BoardRenderer`](crate::render::BoardRenderer).
//!
//! ## Sub-modules
//! - `types` - BoardSnapshot, PlayerEvent, PlayerNotification
//! - `engine` - Pure snapshot resolution for one playback time
//! - `timer` - Cancellable poll timer (at most one interval per session)
//! - `source` - VideoSource trait and an in-process simulated player
//! - `session` - SyncSession, the orchestrator that owns all of the above
//!
//! ## Triggers
//!
//! A session resyncs on two kinds of wake-up, both handled on one task:
//!
//! ### Poll timer
//! - Runs only while the player reports `Playing`
//! - Reads the playhead every `poll-interval-ms` (200ms by default)
//!
//! ### Player notifications
//! - `Playing`, `Paused`, `Ended`, `Unstarted`, `RateChanged`
//! - Each carries the playhead at the moment of the transition and resyncs once
//!
//! Both paths compute the snapshot as a pure function of the timeline and the
//! time, so whichever runs last wins and the order between them does not matter.
//!
//! ## Example
//! ```rust
//! use boardsync::events::{ChessEvent, MoveEvent};
//! use boardsync::sync::resolve_snapshot;
//! use boardsync::timeline::categorize_events;
//! use boardsync::STARTING_FEN;
//!
//! let events = vec![ChessEvent::Move(MoveEvent {
//!     id: "m0001".to_string(),
//!     timestamp: 5.0,
//!     from: "e2".to_string(),
//!     to: "e4".to_string(),
//!     san: "e4".to_string(),
//!     fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string(),
//! })];
//! let timeline = categorize_events(&events);
//!
//! let before = resolve_snapshot(&timeline, 3.0, STARTING_FEN);
//! assert_eq!(before.fen, STARTING_FEN);
//! assert!(before.last_move.is_none());
//!
//! let after = resolve_snapshot(&timeline, 5.0, STARTING_FEN);
//! assert_eq!(after.last_move.unwrap().san, "e4");
//! ```

mod engine;
mod session;
mod source;
mod timer;
mod types;

#[cfg(test)]
mod tests;

pub use engine::resolve_snapshot;
pub use session::SyncSession;
pub use source::{simulated_player, SimulatedPlayer, SimulatedSource, VideoSource};
pub use timer::PollTimer;
pub use types::{BoardSnapshot, PlayerEvent, PlayerNotification};
