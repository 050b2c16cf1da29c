//! # Event Model
//!
//! This module defines the time-stamped chess events that drive a board.
//!
//! ## Type Hierarchy
//! ```text
//! ChessEvent (enum, tagged by "type")
//!   ├── Move       instant   timestamp, from, to, san, fen
//!   ├── Position   instant   timestamp, fen
//!   ├── Highlight  interval  [start, end), square, color?
//!   └── Arrow      interval  [start, end), from, to, color?
//! ```
//!
//! ## Key Concepts
//!
//! ### Instant events
//! Moves and positions take effect at `timestamp` and stay in effect until a
//! later one supersedes them. Every move carries the full `fen` after the move,
//! so the board never has to replay moves.
//!
//! ### Interval events
//! Highlights and arrows are active on the half-open range `[start, end)`.
//! An interval whose `end <= start` is never active.
//!
//! ### Ingest
//! Records arrive as loosely-typed data. [`RawEvent`] accepts anything with
//! optional fields, and [`RawEvent::into_event`] turns it into a [`ChessEvent`]
//! or a [`SkipReason`]. A bad record never poisons the rest of the timeline.
//!
//! ## Related Modules
//! - `lesson` - Reads documents into `RawEvent`s and collects skipped records
//! - `timeline` - Partitions and queries `ChessEvent`s

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Discriminant of a [`ChessEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Move,
    Position,
    Highlight,
    Arrow,
}

impl EventKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "move" => Some(EventKind::Move),
            "position" => Some(EventKind::Position),
            "highlight" => Some(EventKind::Highlight),
            "arrow" => Some(EventKind::Arrow),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::Position => "position",
            EventKind::Highlight => "highlight",
            EventKind::Arrow => "arrow",
        }
    }

    /// Prefix used when an id has to be generated for a record ("m0001", "h0002")
    fn id_prefix(&self) -> char {
        match self {
            EventKind::Move => 'm',
            EventKind::Position => 'p',
            EventKind::Highlight => 'h',
            EventKind::Arrow => 'a',
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A move played on the board at `timestamp` seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub id: String,
    pub timestamp: f64,
    pub from: String,
    pub to: String,
    pub san: String,
    /// Board position after the move
    pub fen: String,
}

/// An absolute board position set at `timestamp` seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionEvent {
    pub id: String,
    pub timestamp: f64,
    pub fen: String,
}

/// A square marked while playback time is in `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightEvent {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub square: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An arrow drawn while playback time is in `[start, end)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowEvent {
    pub id: String,
    pub start: f64,
    pub end: f64,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Any event on a lesson timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChessEvent {
    Move(MoveEvent),
    Position(PositionEvent),
    Highlight(HighlightEvent),
    Arrow(ArrowEvent),
}

impl ChessEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChessEvent::Move(_) => EventKind::Move,
            ChessEvent::Position(_) => EventKind::Position,
            ChessEvent::Highlight(_) => EventKind::Highlight,
            ChessEvent::Arrow(_) => EventKind::Arrow,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ChessEvent::Move(m) => &m.id,
            ChessEvent::Position(p) => &p.id,
            ChessEvent::Highlight(h) => &h.id,
            ChessEvent::Arrow(a) => &a.id,
        }
    }
}

/// An event that is active over a half-open time interval
pub trait Annotation {
    fn start(&self) -> f64;
    fn end(&self) -> f64;

    /// `start <= time < end`. Empty and inverted intervals are never active.
    fn is_active_at(&self, time: f64) -> bool {
        self.start() <= time && time < self.end()
    }
}

impl Annotation for HighlightEvent {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

impl Annotation for ArrowEvent {
    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }
}

/// Why a record was left out of the timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("record has no 'type'")]
    MissingType,

    #[error("unrecognized event type '{0}'")]
    UnknownType(String),

    #[error("{kind} event is missing '{field}'")]
    MissingField { kind: EventKind, field: &'static str },

    #[error("{kind} event has a non-finite '{field}'")]
    NonFiniteTime { kind: EventKind, field: &'static str },

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A record that was dropped during ingest, with its position in the source list
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record #{} ({}): {}", self.index, id, self.reason),
            None => write!(f, "record #{}: {}", self.index, self.reason),
        }
    }
}

/// Loosely-typed event record as it appears in a lesson file
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RawEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub timestamp: Option<f64>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub san: Option<String>,
    pub fen: Option<String>,
    pub square: Option<String>,
    pub color: Option<String>,
}

impl RawEvent {
    /// Validate the record and build the typed event.
    ///
    /// `index` is the record's position in the source list; it is only used to
    /// generate an id ("m0003") when the record has none.
    pub fn into_event(self, index: usize) -> Result<ChessEvent, SkipReason> {
        let kind_name = self.kind.as_deref().ok_or(SkipReason::MissingType)?;
        let kind = EventKind::from_str(kind_name)
            .ok_or_else(|| SkipReason::UnknownType(kind_name.to_string()))?;

        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => format!("{}{:04}", kind.id_prefix(), index + 1),
        };

        let event = match kind {
            EventKind::Move => ChessEvent::Move(MoveEvent {
                id,
                timestamp: time_field(kind, "timestamp", self.timestamp)?,
                from: text_field(kind, "from", self.from)?,
                to: text_field(kind, "to", self.to)?,
                san: text_field(kind, "san", self.san)?,
                fen: text_field(kind, "fen", self.fen)?,
            }),
            EventKind::Position => ChessEvent::Position(PositionEvent {
                id,
                timestamp: time_field(kind, "timestamp", self.timestamp)?,
                fen: text_field(kind, "fen", self.fen)?,
            }),
            EventKind::Highlight => ChessEvent::Highlight(HighlightEvent {
                id,
                start: time_field(kind, "start", self.start)?,
                end: time_field(kind, "end", self.end)?,
                square: text_field(kind, "square", self.square)?,
                color: self.color,
            }),
            EventKind::Arrow => ChessEvent::Arrow(ArrowEvent {
                id,
                start: time_field(kind, "start", self.start)?,
                end: time_field(kind, "end", self.end)?,
                from: text_field(kind, "from", self.from)?,
                to: text_field(kind, "to", self.to)?,
                color: self.color,
            }),
        };

        Ok(event)
    }
}

fn time_field(kind: EventKind, field: &'static str, value: Option<f64>) -> Result<f64, SkipReason> {
    let value = value.ok_or(SkipReason::MissingField { kind, field })?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SkipReason::NonFiniteTime { kind, field })
    }
}

fn text_field(
    kind: EventKind,
    field: &'static str,
    value: Option<String>,
) -> Result<String, SkipReason> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(SkipReason::MissingField { kind, field }),
    }
}
