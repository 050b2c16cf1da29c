//! Video sources
//!
//! A session only needs to read the playhead; transitions reach it separately
//! as [`PlayerNotification`]s. [`simulated_player`] provides an in-process
//! player for the CLI and for tests.

use super::types::{PlayerEvent, PlayerNotification};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::debug;

/// Read access to a video's playhead
pub trait VideoSource {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
struct Playhead {
    /// Position at `anchor`
    position: f64,
    anchor: Instant,
    rate: f64,
    playing: bool,
}

impl Playhead {
    fn time_at(&self, now: Instant) -> f64 {
        if self.playing {
            self.position + now.duration_since(self.anchor).as_secs_f64() * self.rate
        } else {
            self.position
        }
    }

    /// Fold elapsed play time into `position` and move the anchor to `now`.
    fn rebase(&mut self, now: Instant) {
        self.position = self.time_at(now);
        self.anchor = now;
    }
}

/// Controls a simulated video and reports its transitions.
///
/// Dropping the player closes the notification channel, which ends
/// [`SyncSession::run`](super::SyncSession::run).
#[derive(Debug)]
pub struct SimulatedPlayer {
    playhead: watch::Sender<Playhead>,
    notifications: mpsc::UnboundedSender<PlayerNotification>,
}

/// Playhead reader paired with a [`SimulatedPlayer`]
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    playhead: watch::Receiver<Playhead>,
}

/// Create an unstarted simulated player at position zero.
///
/// Returns the player controls, the source to hand to a session, and the
/// receiving end of the player's notifications.
pub fn simulated_player() -> (
    SimulatedPlayer,
    SimulatedSource,
    mpsc::UnboundedReceiver<PlayerNotification>,
) {
    let (playhead_tx, playhead_rx) = watch::channel(Playhead {
        position: 0.0,
        anchor: Instant::now(),
        rate: 1.0,
        playing: false,
    });
    let (notify_tx, notify_rx) = mpsc::unbounded_channel();
    (
        SimulatedPlayer {
            playhead: playhead_tx,
            notifications: notify_tx,
        },
        SimulatedSource {
            playhead: playhead_rx,
        },
        notify_rx,
    )
}

impl SimulatedPlayer {
    pub fn current_time(&self) -> f64 {
        self.playhead.borrow().time_at(Instant::now())
    }

    pub fn is_playing(&self) -> bool {
        self.playhead.borrow().playing
    }

    pub fn play(&self) {
        self.update(|p| p.playing = true);
        self.notify(PlayerEvent::Playing);
    }

    pub fn pause(&self) {
        self.update(|p| p.playing = false);
        self.notify(PlayerEvent::Paused);
    }

    pub fn end(&self) {
        self.update(|p| p.playing = false);
        self.notify(PlayerEvent::Ended);
    }

    /// Jump to `time`. Reported as a fresh `Playing` or `Paused` transition,
    /// the way embedded players re-announce their state after a seek.
    pub fn seek(&self, time: f64) {
        let now = Instant::now();
        self.playhead.send_modify(|p| {
            p.position = time.max(0.0);
            p.anchor = now;
        });
        let event = if self.is_playing() {
            PlayerEvent::Playing
        } else {
            PlayerEvent::Paused
        };
        self.notify(event);
    }

    pub fn set_rate(&self, rate: f64) {
        self.update(|p| p.rate = rate);
        self.notify(PlayerEvent::RateChanged);
    }

    fn update(&self, change: impl FnOnce(&mut Playhead)) {
        let now = Instant::now();
        self.playhead.send_modify(|p| {
            p.rebase(now);
            change(p);
        });
    }

    fn notify(&self, event: PlayerEvent) {
        let notification = PlayerNotification::new(event, self.current_time());
        if self.notifications.send(notification).is_err() {
            debug!(?event, "no session listening for player notifications");
        }
    }
}

impl VideoSource for SimulatedSource {
    fn current_time(&self) -> f64 {
        self.playhead.borrow().time_at(Instant::now())
    }
}
