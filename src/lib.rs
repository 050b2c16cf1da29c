pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod lesson;
pub mod render;
pub mod sync;
pub mod timeline;
pub mod video;

pub use api::{initial_fen_for, load_lesson, load_lesson_file, snapshot_at, start_session};
pub use config::{SyncConfig, STARTING_FEN};
pub use error::*;
pub use events::{ArrowEvent, ChessEvent, HighlightEvent, MoveEvent, PositionEvent};
pub use lesson::{Lesson, LessonFormat, LessonMetadata};
pub use sync::{BoardSnapshot, PlayerEvent, PlayerNotification, SyncSession};
pub use video::{extract_video_id, VideoId};
