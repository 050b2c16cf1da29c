//! # Error Types
//!
//! This module defines all error types for the board sync engine.
//!
//! Engine errors are local: a bad event record is skipped (see
//! [`SkippedRecord`](crate::events::SkippedRecord)) rather than surfaced here.
//! Only problems that make a whole lesson, config file or session unusable
//! become a [`SyncError`].
//!
//! ## Error Types
//! - `LessonError` - The lesson document could not be read as a list of events
//! - `InvalidVideo` - No video identifier could be extracted; blocks session start
//! - `ConfigError` - Invalid YAML configuration
//! - `Io` - A file could not be read
//!
//! ## Usage
//! ```rust
//! use boardsync::{load_lesson, SyncError, LessonFormat};
//!
//! match load_lesson("{ not: [valid", LessonFormat::Yaml) {
//!     Ok(lesson) => println!("{} events", lesson.events.len()),
//!     Err(SyncError::LessonError(message)) => eprintln!("Bad lesson: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The lesson document is structurally unusable.
    ///
    /// Occurs when the input is not valid YAML/JSON, or is neither a list of
    /// events nor a document with an `events` list.
    ///
    /// # Example
    /// ```
    /// # use boardsync::SyncError;
    /// let err = SyncError::LessonError("expected a list of events".to_string());
    /// assert_eq!(err.to_string(), "Invalid lesson: expected a list of events");
    /// ```
    #[error("Invalid lesson: {0}")]
    LessonError(String),

    /// No canonical video identifier could be extracted from the input.
    ///
    /// # Example
    /// ```
    /// # use boardsync::SyncError;
    /// let err = SyncError::InvalidVideo { input: "not a url".to_string() };
    /// assert_eq!(err.to_string(), "Cannot display video: 'not a url' is not a recognized video URL or id");
    /// ```
    #[error("Cannot display video: '{input}' is not a recognized video URL or id")]
    InvalidVideo { input: String },

    /// Invalid configuration.
    #[error("Invalid config: {0}")]
    ConfigError(String),

    /// A file could not be read.
    #[error("Error reading '{path}': {message}")]
    Io { path: String, message: String },
}
