use super::*;
use crate::config::{SyncConfig, STARTING_FEN};
use crate::events::{ArrowEvent, ChessEvent, HighlightEvent, MoveEvent, PositionEvent};
use crate::render::{CommandLog, RenderCommand};
use crate::timeline::categorize_events;
use crate::SyncError;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const VIDEO: &str = "https://www.youtube.com/watch?v=abc12345678";
const F1: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
const F2: &str = "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2";
const P1: &str = "4k3/8/8/8/8/8/8/4K3 w - - 0 1";

fn mv(id: &str, timestamp: f64, fen: &str) -> ChessEvent {
    ChessEvent::Move(MoveEvent {
        id: id.to_string(),
        timestamp,
        from: "e2".to_string(),
        to: "e4".to_string(),
        san: id.to_string(),
        fen: fen.to_string(),
    })
}

fn pos(id: &str, timestamp: f64, fen: &str) -> ChessEvent {
    ChessEvent::Position(PositionEvent {
        id: id.to_string(),
        timestamp,
        fen: fen.to_string(),
    })
}

fn hl(id: &str, start: f64, end: f64, square: &str) -> ChessEvent {
    ChessEvent::Highlight(HighlightEvent {
        id: id.to_string(),
        start,
        end,
        square: square.to_string(),
        color: None,
    })
}

fn arrow(id: &str, start: f64, end: f64, from: &str, to: &str) -> ChessEvent {
    ChessEvent::Arrow(ArrowEvent {
        id: id.to_string(),
        start,
        end,
        from: from.to_string(),
        to: to.to_string(),
        color: None,
    })
}

fn snapshot_at(events: &[ChessEvent], time: f64) -> BoardSnapshot {
    resolve_snapshot(&categorize_events(events), time, STARTING_FEN)
}

/// Source whose playhead is set by the test; counts how often it is read.
#[derive(Clone, Default)]
struct ManualSource {
    time: Rc<Cell<f64>>,
    polls: Rc<Cell<usize>>,
}

impl VideoSource for ManualSource {
    fn current_time(&self) -> f64 {
        self.polls.set(self.polls.get() + 1);
        self.time.get()
    }
}

fn session(events: Vec<ChessEvent>) -> (SyncSession<ManualSource, CommandLog>, ManualSource) {
    let source = ManualSource::default();
    let session = SyncSession::new(
        VIDEO,
        events.into(),
        source.clone(),
        CommandLog::new(),
        &SyncConfig::default(),
    )
    .unwrap();
    (session, source)
}

fn commands(session: &SyncSession<ManualSource, CommandLog>) -> Vec<RenderCommand> {
    session.renderer().commands().to_vec()
}

#[test]
fn test_before_first_move_shows_initial_position() {
    let snapshot = snapshot_at(&[mv("e4", 5.0, F1)], 3.0);
    assert_eq!(snapshot.fen, STARTING_FEN);
    assert_eq!(snapshot.last_move, None);
    assert_eq!(snapshot.move_index, None);
}

#[test]
fn test_move_reached_exactly() {
    let snapshot = snapshot_at(&[mv("e4", 5.0, F1)], 5.0);
    assert_eq!(snapshot.fen, F1);
    assert_eq!(snapshot.last_move.as_ref().map(|m| m.san.as_str()), Some("e4"));
    assert_eq!(snapshot.move_index, Some(0));
}

#[test]
fn test_position_used_until_first_move() {
    let events = [pos("p1", 2.0, P1), mv("e4", 5.0, F1)];
    let snapshot = snapshot_at(&events, 3.0);
    assert_eq!(snapshot.fen, P1);
    assert_eq!(snapshot.last_move, None);

    assert_eq!(snapshot_at(&events, 1.0).fen, STARTING_FEN);
    assert_eq!(snapshot_at(&events, 5.0).fen, F1);
}

#[test]
fn test_any_reached_move_outranks_later_position() {
    // The position at 3.0 is later than the move at 1.0, but moves always win.
    let events = [mv("e4", 1.0, F1), pos("p1", 3.0, P1)];
    let snapshot = snapshot_at(&events, 4.0);
    assert_eq!(snapshot.fen, F1);
    assert_eq!(snapshot.move_index, Some(0));
}

#[test]
fn test_latest_move_wins() {
    let events = [mv("e5", 3.45, F2), mv("e4", 1.68, F1)];
    assert_eq!(snapshot_at(&events, 2.0).fen, F1);
    let snapshot = snapshot_at(&events, 3.45);
    assert_eq!(snapshot.fen, F2);
    assert_eq!(snapshot.move_index, Some(1));
}

#[test]
fn test_highlight_boundaries() {
    let events = [hl("h1", 2.0, 5.0, "e4")];
    assert_eq!(snapshot_at(&events, 2.0).highlights, vec!["e4"]);
    assert_eq!(snapshot_at(&events, 4.999).highlights, vec!["e4"]);
    assert!(snapshot_at(&events, 5.0).highlights.is_empty());
}

#[test]
fn test_highlight_squares_deduplicated_in_start_order() {
    let events = [
        hl("h3", 3.0, 9.0, "d4"),
        hl("h1", 1.0, 9.0, "e4"),
        hl("h2", 2.0, 9.0, "e4"),
    ];
    assert_eq!(snapshot_at(&events, 4.0).highlights, vec!["e4", "d4"]);
}

#[test]
fn test_overlapping_arrows_in_start_order() {
    let events = [
        arrow("a2", 2.0, 10.0, "e1", "g1"),
        arrow("a1", 1.0, 10.0, "c4", "f7"),
    ];
    let snapshot = snapshot_at(&events, 5.0);
    let ids: Vec<&str> = snapshot.arrows.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2"]);
}

#[test]
fn test_resolution_is_idempotent() {
    let events = [
        pos("p1", 0.0, P1),
        mv("e4", 1.0, F1),
        hl("h1", 0.5, 3.0, "e4"),
        arrow("a1", 0.5, 3.0, "c4", "f7"),
    ];
    let timeline = categorize_events(&events);
    let first = resolve_snapshot(&timeline, 2.5, STARTING_FEN);
    let second = resolve_snapshot(&timeline, 2.5, STARTING_FEN);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_snapshot_serializes_camel_case() {
    let json = serde_json::to_value(snapshot_at(&[mv("e4", 0.0, F1)], 1.0)).unwrap();
    assert_eq!(json["fen"], F1);
    assert_eq!(json["moveIndex"], 0);
    assert_eq!(json["lastMove"]["san"], "e4");
}

#[test]
fn test_invalid_video_blocks_session() {
    let result = SyncSession::new(
        "not a url",
        Vec::new().into(),
        ManualSource::default(),
        CommandLog::new(),
        &SyncConfig::default(),
    );
    match result {
        Err(SyncError::InvalidVideo { input }) => assert_eq!(input, "not a url"),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("session started without a video"),
    }
}

#[test]
fn test_new_session_renders_current_time() {
    let (session, source) = session(vec![pos("p1", 0.0, P1), hl("h1", 0.0, 1.0, "a1")]);
    assert_eq!(session.video_id().as_str(), "abc12345678");
    assert_eq!(source.polls.get(), 1);
    assert!(!session.is_playing());
    assert!(!session.timer_active());
    assert_eq!(
        session.renderer().commands(),
        &[
            RenderCommand::SetPosition(P1.to_string()),
            RenderCommand::ClearHighlights,
            RenderCommand::AddHighlight("a1".to_string()),
            RenderCommand::ClearArrows,
        ]
    );
}

#[test]
fn test_notifications_start_and_stop_one_timer() {
    let (mut session, _source) = session(vec![mv("e4", 1.0, F1)]);

    session.handle_notification(PlayerNotification::new(PlayerEvent::Playing, 0.0));
    assert!(session.is_playing());
    assert!(session.timer_active());

    // A second Playing restarts rather than stacking timers.
    session.handle_notification(PlayerNotification::new(PlayerEvent::Playing, 0.5));
    assert!(session.timer_active());
    assert_eq!(session.timer().starts(), 2);

    session.handle_notification(PlayerNotification::new(PlayerEvent::RateChanged, 0.7));
    assert!(session.timer_active());

    let snapshot = session.handle_notification(PlayerNotification::new(PlayerEvent::Paused, 1.2));
    assert_eq!(snapshot.fen, F1);
    assert!(!session.is_playing());
    assert!(!session.timer_active());

    session.handle_notification(PlayerNotification::new(PlayerEvent::Playing, 1.2));
    session.handle_notification(PlayerNotification::new(PlayerEvent::Ended, 9.0));
    assert!(!session.timer_active());
    assert_eq!(session.snapshot().time, 9.0);
}

#[test]
fn test_tick_ignored_while_paused() {
    let (mut session, source) = session(vec![mv("e4", 1.0, F1)]);
    source.time.set(2.0);
    assert!(session.on_tick().is_none());
    assert_eq!(session.snapshot().fen, STARTING_FEN);

    session.handle_notification(PlayerNotification::new(PlayerEvent::Playing, 0.0));
    let snapshot = session.on_tick().unwrap();
    assert_eq!(snapshot.fen, F1);
    assert_eq!(snapshot.time, 2.0);
}

#[test]
fn test_unchanged_board_is_not_re_rendered() {
    let (mut session, _source) = session(vec![mv("e4", 1.0, F1), hl("h1", 3.0, 4.0, "e4")]);
    let initial = commands(&session).len();

    session.sync_to(0.5);
    session.sync_to(0.5);
    assert_eq!(commands(&session).len(), initial);

    session.sync_to(1.0);
    let after_move = commands(&session);
    assert_eq!(&after_move[initial..], &[RenderCommand::SetPosition(F1.to_string())]);

    session.sync_to(3.0);
    let after_highlight = commands(&session);
    assert_eq!(
        &after_highlight[initial + 1..],
        &[
            RenderCommand::ClearHighlights,
            RenderCommand::AddHighlight("e4".to_string()),
        ]
    );
}

#[test]
fn test_every_sync_rendered_when_skipping_disabled() {
    let config = SyncConfig {
        skip_redundant_renders: false,
        ..SyncConfig::default()
    };
    let mut session = SyncSession::new(
        VIDEO,
        vec![mv("e4", 1.0, F1)].into(),
        ManualSource::default(),
        CommandLog::new(),
        &config,
    )
    .unwrap();
    session.sync_to(0.0);
    let commands = session.renderer().commands();
    assert_eq!(commands.len(), 6);
    assert_eq!(commands[0], commands[3]);
}

#[test]
fn test_invalid_annotation_squares_are_skipped() {
    let (session, _source) = session(vec![
        hl("h1", 0.0, 5.0, "z9"),
        hl("h2", 0.0, 5.0, "d5"),
        arrow("a1", 0.0, 5.0, "c4", "f77"),
        arrow("a2", 0.0, 5.0, "e1", "g1"),
    ]);
    assert_eq!(
        session.renderer().commands(),
        &[
            RenderCommand::SetPosition(STARTING_FEN.to_string()),
            RenderCommand::ClearHighlights,
            RenderCommand::AddHighlight("d5".to_string()),
            RenderCommand::ClearArrows,
            RenderCommand::AddArrow {
                from: "e1".to_string(),
                to: "g1".to_string()
            },
        ]
    );
    // The snapshot still reports what the timeline says.
    assert_eq!(session.snapshot().highlights, vec!["z9", "d5"]);
    assert_eq!(session.snapshot().arrows.len(), 2);
}

#[test]
fn test_load_events_reindexes() {
    let (mut session, source) = session(vec![mv("e4", 1.0, F1)]);
    source.time.set(2.0);
    session.sync_to(2.0);
    assert_eq!(session.snapshot().fen, F1);

    let replacement: Arc<[ChessEvent]> = vec![pos("p1", 0.0, P1)].into();
    let snapshot = session.load_events(Arc::clone(&replacement));
    assert_eq!(snapshot.fen, P1);
    assert_eq!(session.timeline().positions.len(), 1);
    assert!(session.timeline().moves.is_empty());
}

#[test]
fn test_load_events_same_list_keeps_index() {
    let events: Arc<[ChessEvent]> = vec![mv("e4", 1.0, F1), mv("e5", 3.0, F2)].into();
    let source = ManualSource::default();
    let mut session = SyncSession::new(
        VIDEO,
        Arc::clone(&events),
        source.clone(),
        CommandLog::new(),
        &SyncConfig::default(),
    )
    .unwrap();
    assert_eq!(session.timeline_builds(), 1);

    source.time.set(3.5);
    let snapshot = session.load_events(Arc::clone(&events));
    assert_eq!(snapshot.fen, F2);
    assert_eq!(session.timeline_builds(), 1);

    // Equal contents in a new list still count as a new list.
    let copy: Arc<[ChessEvent]> = events.to_vec().into();
    session.load_events(copy);
    assert_eq!(session.timeline_builds(), 2);
    assert_eq!(session.timeline().moves.len(), 2);
}

#[test]
fn test_poll_interval_comes_from_config() {
    let config = SyncConfig {
        poll_interval_ms: 50,
        ..SyncConfig::default()
    };
    let mut session = SyncSession::new(
        VIDEO,
        Vec::new().into(),
        ManualSource::default(),
        CommandLog::new(),
        &config,
    )
    .unwrap();
    assert_eq!(session.timer().period(), Duration::from_millis(50));

    session.handle_notification(PlayerNotification::new(PlayerEvent::Playing, 0.0));
    assert!(session.timer_active());
    assert_eq!(session.timer().period(), Duration::from_millis(50));
}

#[test]
fn test_teardown_stops_timer_and_releases_renderer() {
    let (mut session, _source) = session(Vec::new());
    session.handle_notification(PlayerNotification::new(PlayerEvent::Playing, 0.0));
    assert!(session.timer_active());
    let log = session.teardown();
    assert!(log.is_released());
}

#[tokio::test(start_paused = true)]
async fn test_run_polls_only_while_playing() {
    let source = ManualSource::default();
    let polls = Rc::clone(&source.polls);
    let session = SyncSession::new(
        VIDEO,
        vec![mv("e4", 5.0, F1)].into(),
        source.clone(),
        CommandLog::new(),
        &SyncConfig::default(),
    )
    .unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    let driver = async move {
        tx.send(PlayerNotification::new(PlayerEvent::Playing, 0.0)).unwrap();
        tokio::time::sleep(Duration::from_millis(1_100)).await;
        let polls_while_playing = polls.get();
        // One read at session start, then one per 200ms tick.
        assert_eq!(polls_while_playing, 1 + 5);

        tx.send(PlayerNotification::new(PlayerEvent::Paused, 1.1)).unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(polls.get(), polls_while_playing);
    };

    let (log, ()) = tokio::join!(session.run(rx), driver);
    assert!(log.is_released());
}

#[tokio::test(start_paused = true)]
async fn test_run_with_simulated_player() {
    let (player, source, notifications) = simulated_player();
    let session = SyncSession::new(
        VIDEO,
        vec![mv("e4", 5.0, F1), hl("h1", 6.0, 7.0, "f7")].into(),
        source,
        CommandLog::new(),
        &SyncConfig::default(),
    )
    .unwrap();

    let driver = async move {
        player.play();
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        player.pause();
        tokio::time::sleep(Duration::from_secs(10)).await;
    };

    let mut changes = Vec::new();
    let run = session.run_with(notifications, |snapshot, _| {
        changes.push(snapshot.fen.clone());
    });
    let (log, ()) = tokio::join!(run, driver);

    assert_eq!(changes, vec![F1.to_string()]);
    assert_eq!(
        log.commands(),
        &[
            RenderCommand::SetPosition(STARTING_FEN.to_string()),
            RenderCommand::ClearHighlights,
            RenderCommand::ClearArrows,
            RenderCommand::SetPosition(F1.to_string()),
        ]
    );
    assert!(log.is_released());
}
