//! # Public API
//!
//! Entry points that tie lessons, configuration and sessions together.
//!
//! ## Functions
//!
//! - [`load_lesson()`] - Parse a lesson from a string
//! - [`load_lesson_file()`] - Parse a lesson file (format from extension)
//! - [`snapshot_at()`] - Board state of a lesson at one time, no session needed
//! - [`start_session()`] - Open a [`SyncSession`] for a lesson's video
//!
//! ## Typical Usage
//!
//! ```rust
//! use boardsync::{load_lesson, snapshot_at, LessonFormat, SyncConfig};
//!
//! let source = r#"
//! video: abc12345678
//! events:
//!   - { id: h0001, type: highlight, start: 2, end: 5, square: e4 }
//! "#;
//!
//! let lesson = load_lesson(source, LessonFormat::Yaml)?;
//! let board = snapshot_at(&lesson, 2.0, &SyncConfig::default());
//! assert_eq!(board.highlights, vec!["e4"]);
//! # Ok::<(), boardsync::SyncError>(())
//! ```

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::lesson::{parse_lesson, read_lesson_file, Lesson, LessonFormat};
use crate::render::BoardRenderer;
use crate::sync::{resolve_snapshot, BoardSnapshot, SyncSession, VideoSource};
use crate::timeline::categorize_events;
use std::path::Path;

/// Parse a lesson document from a string.
///
/// Records that can't be used are listed in [`Lesson::skipped`].
///
/// # Errors
/// Returns [`SyncError::LessonError`] if the document itself is unreadable.
pub fn load_lesson(source: &str, format: LessonFormat) -> Result<Lesson, SyncError> {
    parse_lesson(source, format)
}

/// Read a lesson file. `.json` files are parsed as JSON, anything else as YAML.
///
/// # Errors
/// Returns [`SyncError::Io`] if the file can't be read, or
/// [`SyncError::LessonError`] if its contents are unreadable.
pub fn load_lesson_file(path: impl AsRef<Path>) -> Result<Lesson, SyncError> {
    read_lesson_file(path.as_ref())
}

/// Board shown before any move or position: the lesson's own `initial-fen`
/// if it has one, otherwise the configured one.
pub fn initial_fen_for<'a>(lesson: &'a Lesson, config: &'a SyncConfig) -> &'a str {
    lesson
        .metadata
        .initial_fen
        .as_deref()
        .unwrap_or(&config.initial_fen)
}

/// Compute the board for `time` without a session.
///
/// Indexes the lesson on every call; use a [`SyncSession`] to query
/// repeatedly.
pub fn snapshot_at(lesson: &Lesson, time: f64, config: &SyncConfig) -> BoardSnapshot {
    let timeline = categorize_events(&lesson.events);
    resolve_snapshot(&timeline, time, initial_fen_for(lesson, config))
}

/// Start a session for a lesson.
///
/// The video comes from `video` when given, otherwise from the lesson's
/// `video` field.
///
/// # Errors
/// Returns [`SyncError::InvalidVideo`] when there is no video reference or it
/// can't be parsed.
///
/// # Example
/// ```rust
/// use boardsync::{load_lesson, start_session, LessonFormat, SyncConfig};
/// use boardsync::render::CommandLog;
/// use boardsync::sync::VideoSource;
///
/// struct Paused(f64);
/// impl VideoSource for Paused {
///     fn current_time(&self) -> f64 { self.0 }
/// }
///
/// let lesson = load_lesson("video: https://youtu.be/abc12345678\nevents: []", LessonFormat::Yaml)?;
/// let session = start_session(&lesson, None, Paused(0.0), CommandLog::new(), &SyncConfig::default())?;
/// assert_eq!(session.video_id().as_str(), "abc12345678");
/// # Ok::<(), boardsync::SyncError>(())
/// ```
pub fn start_session<S: VideoSource, R: BoardRenderer>(
    lesson: &Lesson,
    video: Option<&str>,
    source: S,
    renderer: R,
    config: &SyncConfig,
) -> Result<SyncSession<S, R>, SyncError> {
    let video_ref = video.or(lesson.metadata.video.as_deref()).unwrap_or("");
    let config = SyncConfig {
        initial_fen: initial_fen_for(lesson, config).to_string(),
        ..config.clone()
    };
    SyncSession::new(video_ref, lesson.events.clone().into(), source, renderer, &config)
}
