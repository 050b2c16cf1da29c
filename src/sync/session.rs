//! Sync session
//!
//! Owns everything one board/video pairing needs: the event list and its
//! index, the video source, the renderer, the poll timer and the last
//! snapshot. Nothing is global; dropping or tearing down the session releases
//! all of it.

use super::engine::resolve_snapshot;
use super::source::VideoSource;
use super::timer::PollTimer;
use super::types::{BoardSnapshot, PlayerEvent, PlayerNotification};
use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::events::ChessEvent;
use crate::render::{is_valid_square, BoardRenderer};
use crate::timeline::{Timeline, TimelineCache};
use crate::video::{extract_video_id, VideoId};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Keeps a board in step with a video's playhead.
///
/// # Lifecycle
/// 1. [`SyncSession::new`] resolves the video id (failing fast if there is
///    none), indexes the events and renders the board for the source's
///    current time.
/// 2. Player transitions go to [`handle_notification`](Self::handle_notification);
///    each one resyncs immediately. `Playing` starts the poll timer and every
///    other transition except `RateChanged` stops it.
/// 3. While playing, each timer tick calls [`on_tick`](Self::on_tick), which
///    reads the playhead and resyncs.
/// 4. [`teardown`](Self::teardown) stops the timer, releases the renderer and
///    hands it back.
///
/// [`run`](Self::run) wires steps 2-4 to a notification channel.
pub struct SyncSession<S, R> {
    video_id: VideoId,
    events: Arc<[ChessEvent]>,
    index: TimelineCache,
    source: S,
    renderer: R,
    timer: PollTimer,
    initial_fen: String,
    skip_redundant_renders: bool,
    playing: bool,
    snapshot: BoardSnapshot,
    rendered: Option<BoardSnapshot>,
}

enum Wake {
    Notification(Option<PlayerNotification>),
    Tick,
}

impl<S: VideoSource, R: BoardRenderer> SyncSession<S, R> {
    /// Start a session for the video referenced by `video_ref`.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidVideo`] when no video id can be extracted.
    /// No timer is started and the renderer is not touched in that case.
    pub fn new(
        video_ref: &str,
        events: Arc<[ChessEvent]>,
        source: S,
        renderer: R,
        config: &SyncConfig,
    ) -> Result<Self, SyncError> {
        let video_id = extract_video_id(video_ref).ok_or_else(|| SyncError::InvalidVideo {
            input: video_ref.to_string(),
        })?;

        let mut session = Self {
            video_id,
            events,
            index: TimelineCache::new(),
            source,
            renderer,
            timer: PollTimer::new(config.poll_interval()),
            initial_fen: config.initial_fen.clone(),
            skip_redundant_renders: config.skip_redundant_renders,
            playing: false,
            snapshot: BoardSnapshot::initial(&config.initial_fen),
            rendered: None,
        };

        let stats = session.index.get(&session.events).stats();
        info!(
            video_id = %session.video_id,
            moves = stats.moves,
            positions = stats.positions,
            highlights = stats.highlights,
            arrows = stats.arrows,
            "sync session started"
        );

        let time = session.source.current_time();
        session.resync(time);
        Ok(session)
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    pub fn timeline(&self) -> &Timeline {
        self.index.current()
    }

    /// How many times the event list has been indexed over the session's life
    pub fn timeline_builds(&self) -> u64 {
        self.index.builds()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn timer_active(&self) -> bool {
        self.timer.is_active()
    }

    pub fn timer(&self) -> &PollTimer {
        &self.timer
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Apply a player transition and resync at the time it carries.
    pub fn handle_notification(&mut self, notification: PlayerNotification) -> &BoardSnapshot {
        self.apply(notification);
        &self.snapshot
    }

    /// Returns whether the renderer was updated.
    fn apply(&mut self, notification: PlayerNotification) -> bool {
        info!(
            event = ?notification.event,
            time = notification.time,
            "player state changed"
        );

        match notification.event {
            PlayerEvent::Playing => {
                self.playing = true;
                self.timer.start();
                debug!(
                    period_ms = self.timer.period().as_millis() as u64,
                    "poll timer started"
                );
            }
            PlayerEvent::Paused | PlayerEvent::Ended | PlayerEvent::Unstarted => {
                self.playing = false;
                if self.timer.stop() {
                    debug!("poll timer stopped");
                }
            }
            PlayerEvent::RateChanged => {}
        }

        self.resync(notification.time)
    }

    /// Timer callback: read the playhead and resync. Ignored while not playing.
    pub fn on_tick(&mut self) -> Option<&BoardSnapshot> {
        if !self.playing {
            return None;
        }
        let time = self.source.current_time();
        self.resync(time);
        Some(&self.snapshot)
    }

    /// Recompute the snapshot for `time` and push any changes to the renderer.
    pub fn sync_to(&mut self, time: f64) -> &BoardSnapshot {
        self.resync(time);
        &self.snapshot
    }

    /// Swap in a new event list. It is re-indexed only if it is a different
    /// list from the current one; the board is then resynced at the playhead.
    pub fn load_events(&mut self, events: Arc<[ChessEvent]>) -> &BoardSnapshot {
        self.events = events;
        let time = self.source.current_time();
        self.sync_to(time)
    }

    /// Returns whether the renderer was updated.
    fn resync(&mut self, time: f64) -> bool {
        let timeline = self.index.get(&self.events);
        let snapshot = resolve_snapshot(timeline, time, &self.initial_fen);

        debug!(
            time,
            move_index = ?snapshot.move_index,
            highlights = snapshot.highlights.len(),
            arrows = snapshot.arrows.len(),
            "board resynced"
        );

        let changed = self.render(&snapshot);
        self.snapshot = snapshot;
        changed
    }

    fn render(&mut self, snapshot: &BoardSnapshot) -> bool {
        let previous = if self.skip_redundant_renders {
            self.rendered.as_ref()
        } else {
            None
        };
        let mut changed = false;

        if previous.map_or(true, |p| p.fen != snapshot.fen) {
            self.renderer.set_position(&snapshot.fen);
            changed = true;
        }

        if previous.map_or(true, |p| p.highlights != snapshot.highlights) {
            self.renderer.clear_highlights();
            for square in &snapshot.highlights {
                if is_valid_square(square) {
                    self.renderer.add_highlight(square);
                } else {
                    warn!(square = %square, "skipping highlight on invalid square");
                }
            }
            changed = true;
        }

        if previous.map_or(true, |p| p.arrows != snapshot.arrows) {
            self.renderer.clear_arrows();
            for arrow in &snapshot.arrows {
                if is_valid_square(&arrow.from) && is_valid_square(&arrow.to) {
                    self.renderer.add_arrow(&arrow.from, &arrow.to);
                } else {
                    warn!(id = %arrow.id, from = %arrow.from, to = %arrow.to, "skipping invalid arrow");
                }
            }
            changed = true;
        }

        if changed {
            self.rendered = Some(snapshot.clone());
        }
        changed
    }

    /// Stop polling and release the renderer.
    pub fn teardown(mut self) -> R {
        self.timer.stop();
        self.playing = false;
        self.renderer.release();
        info!(video_id = %self.video_id, "sync session torn down");
        self.renderer
    }

    /// Drive the session from a notification channel until it closes.
    ///
    /// Notifications and timer ticks are handled on this one task, so the
    /// session state is never touched concurrently. Returns the released renderer.
    pub async fn run(self, notifications: mpsc::UnboundedReceiver<PlayerNotification>) -> R {
        self.run_with(notifications, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_change` after every resync that
    /// updated the renderer.
    pub async fn run_with<F>(
        mut self,
        mut notifications: mpsc::UnboundedReceiver<PlayerNotification>,
        mut on_change: F,
    ) -> R
    where
        F: FnMut(&BoardSnapshot, &R),
    {
        loop {
            let wake = tokio::select! {
                biased;
                notification = notifications.recv() => Wake::Notification(notification),
                _ = self.timer.tick() => Wake::Tick,
            };

            let changed = match wake {
                Wake::Notification(Some(notification)) => self.apply(notification),
                Wake::Notification(None) => break,
                Wake::Tick => {
                    if !self.playing {
                        continue;
                    }
                    let time = self.source.current_time();
                    self.resync(time)
                }
            };

            if changed {
                on_change(&self.snapshot, &self.renderer);
            }
        }

        self.teardown()
    }
}
