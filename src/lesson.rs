//! # Lesson Documents
//!
//! Reads a lesson (the event timeline for one video) from YAML or JSON.
//!
//! ## Accepted Shapes
//!
//! A bare list of event records:
//! ```yaml
//! - { id: m0001, type: move, timestamp: 1.68, from: e2, to: e4, san: e4, fen: "..." }
//! - { id: h0001, type: highlight, start: 7.02, end: 9.5, square: f7 }
//! ```
//!
//! Or a document with optional metadata:
//! ```yaml
//! title: Italian Game
//! video: https://www.youtube.com/watch?v=abc12345678
//! initial-fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1
//! events:
//!   - ...
//! ```
//!
//! Each record is converted on its own, so one bad record is reported in
//! [`Lesson::skipped`] and the rest of the timeline stays usable.

use crate::error::SyncError;
use crate::events::{ChessEvent, RawEvent, SkipReason, SkippedRecord};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Source syntax of a lesson document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonFormat {
    Yaml,
    Json,
}

impl LessonFormat {
    /// `.json` files are JSON; everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => LessonFormat::Json,
            _ => LessonFormat::Yaml,
        }
    }
}

/// Optional document-level settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonMetadata {
    pub title: Option<String>,
    /// Raw video reference (URL or bare id); resolved with [`crate::extract_video_id`]
    pub video: Option<String>,
    pub initial_fen: Option<String>,
}

/// A parsed lesson: valid events plus a report of the records that were dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lesson {
    pub metadata: LessonMetadata,
    pub events: Vec<ChessEvent>,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLesson {
    Events(Vec<Value>),
    Document(RawDocument),
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawDocument {
    title: Option<String>,
    video: Option<String>,
    initial_fen: Option<String>,
    events: Vec<Value>,
}

/// Parse a lesson document.
///
/// # Errors
/// Returns [`SyncError::LessonError`] when the source is not valid YAML/JSON or
/// is neither a list of events nor a document with an `events` list.
pub fn parse_lesson(source: &str, format: LessonFormat) -> Result<Lesson, SyncError> {
    let raw: RawLesson = match format {
        LessonFormat::Yaml => {
            serde_yaml::from_str(source).map_err(|e| SyncError::LessonError(e.to_string()))?
        }
        LessonFormat::Json => {
            serde_json::from_str(source).map_err(|e| SyncError::LessonError(e.to_string()))?
        }
    };

    let (metadata, records) = match raw {
        RawLesson::Events(records) => (LessonMetadata::default(), records),
        RawLesson::Document(doc) => (
            LessonMetadata {
                title: doc.title,
                video: doc.video,
                initial_fen: doc.initial_fen.filter(|fen| !fen.trim().is_empty()),
            },
            doc.events,
        ),
    };

    let mut events = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let id = record.get("id").and_then(Value::as_str).map(str::to_string);
        let converted = serde_json::from_value::<RawEvent>(record)
            .map_err(|e| SkipReason::Malformed(e.to_string()))
            .and_then(|raw| raw.into_event(index));

        match converted {
            Ok(event) => events.push(event),
            Err(reason) => {
                let record = SkippedRecord { index, id, reason };
                warn!(%record, "skipping timeline record");
                skipped.push(record);
            }
        }
    }

    debug!(
        events = events.len(),
        skipped = skipped.len(),
        "lesson parsed"
    );

    Ok(Lesson {
        metadata,
        events,
        skipped,
    })
}

/// Read and parse a lesson file, picking the format from its extension.
pub fn read_lesson_file(path: &Path) -> Result<Lesson, SyncError> {
    let source = std::fs::read_to_string(path).map_err(|e| SyncError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_lesson(&source, LessonFormat::from_path(path))
}
