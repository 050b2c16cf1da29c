//! # Timeline Module
//!
//! Index a lesson's events by time and answer "what is true at time T".
//!
//! ## Sub-modules
//! - `indexer` - Partition raw events into four time-sorted sequences
//! - `query` - Binary-search and interval lookups over those sequences
//!
//! ## Key Types
//! - [`Timeline`] - Moves, positions, highlights and arrows, each sorted
//! - [`TimelineCache`] - Re-indexes only when the event list itself changes
//! - [`TimelineStats`] - Per-family counts and the last referenced instant
//!
//! ## Example
//! ```rust
//! use boardsync::events::{ChessEvent, MoveEvent};
//! use boardsync::timeline::{categorize_events, latest_move_index};
//!
//! let events = vec![ChessEvent::Move(MoveEvent {
//!     id: "m0001".to_string(),
//!     timestamp: 5.0,
//!     from: "e2".to_string(),
//!     to: "e4".to_string(),
//!     san: "e4".to_string(),
//!     fen: "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1".to_string(),
//! })];
//!
//! let timeline = categorize_events(&events);
//! assert_eq!(latest_move_index(&timeline.moves, 3.0), None);
//! assert_eq!(latest_move_index(&timeline.moves, 5.0), Some(0));
//! ```
//!
//! ## Related Modules
//! - `events` - Event types being indexed
//! - `sync` - Combines query results into a board snapshot

mod indexer;
mod query;


pub use indexer::{categorize_events, Timeline, TimelineCache, TimelineStats};
pub use query::{active_annotations, latest_move_index, latest_position};
