use boardsync::render::{AsciiBoard, BoardRenderer};
use boardsync::sync::simulated_player;
use boardsync::timeline::categorize_events;
use boardsync::{
    extract_video_id, initial_fen_for, load_lesson_file, snapshot_at, start_session, BoardSnapshot,
    Lesson, SyncConfig, SyncError,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "boardsync", version, about = "Sync a chessboard to a lesson video's timeline")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board shown before the first move or position event
    #[arg(long, global = true)]
    initial_fen: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a lesson file
    Inspect { lesson: PathBuf },

    /// Show the board at one playback time
    At {
        lesson: PathBuf,
        /// Playback time in seconds
        time: f64,
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play the lesson against a simulated video, printing the board as it changes
    Replay {
        lesson: PathBuf,
        /// Start position in seconds
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        /// Stop position in seconds (defaults to the end of the timeline)
        #[arg(long)]
        until: Option<f64>,
        /// Playback rate
        #[arg(long, default_value_t = 1.0)]
        rate: f64,
        /// Video URL or id, overriding the lesson's
        #[arg(long)]
        video: Option<String>,
    },

    /// Print the canonical video id for a URL or id
    VideoId { input: String },
}

fn main() {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match SyncConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => SyncConfig::default(),
    };
    if let Some(fen) = &cli.initial_fen {
        config.initial_fen = fen.clone();
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("BOARDSYNC_LOG")
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Command::Inspect { lesson } => inspect(&lesson, &config),
        Command::At { lesson, time, json } => at(&lesson, time, json, &config),
        Command::Replay {
            lesson,
            from,
            until,
            rate,
            video,
        } => replay(&lesson, from, until, rate, video.as_deref(), &config),
        Command::VideoId { input } => match extract_video_id(&input) {
            Some(id) => {
                println!("{}", id);
                Ok(())
            }
            None => Err(SyncError::InvalidVideo { input }),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn load(path: &Path) -> Result<Lesson, SyncError> {
    let lesson = load_lesson_file(path)?;
    for skipped in &lesson.skipped {
        eprintln!("warning: skipped {}", skipped);
    }
    Ok(lesson)
}

fn inspect(path: &Path, config: &SyncConfig) -> Result<(), SyncError> {
    let lesson = load(path)?;
    let stats = categorize_events(&lesson.events).stats();

    if let Some(title) = &lesson.metadata.title {
        println!("title:      {}", title);
    }
    match lesson.metadata.video.as_deref() {
        Some(video) => match extract_video_id(video) {
            Some(id) => println!("video:      {}", id),
            None => println!("video:      invalid ({})", video),
        },
        None => println!("video:      none"),
    }
    println!("initial:    {}", initial_fen_for(&lesson, config));
    println!("moves:      {}", stats.moves);
    println!("positions:  {}", stats.positions);
    println!("highlights: {}", stats.highlights);
    println!("arrows:     {}", stats.arrows);
    println!("duration:   {:.2}s", stats.duration);
    println!("skipped:    {}", lesson.skipped.len());
    Ok(())
}

fn at(path: &Path, time: f64, json: bool, config: &SyncConfig) -> Result<(), SyncError> {
    let lesson = load(path)?;
    let snapshot = snapshot_at(&lesson, time, config);

    if json {
        let text = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| SyncError::LessonError(e.to_string()))?;
        println!("{}", text);
        return Ok(());
    }

    let mut board = AsciiBoard::new();
    board.set_position(&snapshot.fen);
    for square in &snapshot.highlights {
        board.add_highlight(square);
    }
    for arrow in &snapshot.arrows {
        board.add_arrow(&arrow.from, &arrow.to);
    }
    print_board(&snapshot, &board);
    Ok(())
}

fn replay(
    path: &Path,
    from: f64,
    until: Option<f64>,
    rate: f64,
    video: Option<&str>,
    config: &SyncConfig,
) -> Result<(), SyncError> {
    if !(rate.is_finite() && rate > 0.0) {
        return Err(SyncError::ConfigError(format!("rate must be positive, got {}", rate)));
    }

    if !from.is_finite() || until.is_some_and(|t| !t.is_finite()) {
        return Err(SyncError::ConfigError(
            "--from and --until must be finite".to_string(),
        ));
    }

    let lesson = load(path)?;
    let until = until.unwrap_or_else(|| categorize_events(&lesson.events).stats().duration);
    let wall = Duration::try_from_secs_f64(((until - from) / rate).max(0.0))
        .map_err(|e| SyncError::ConfigError(format!("replay is too long to run: {}", e)))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| SyncError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    runtime.block_on(async {
        let (player, source, notifications) = simulated_player();
        let session = start_session(&lesson, video, source, AsciiBoard::new(), config)?;
        info!(video_id = %session.video_id(), from, until, rate, "replay starting");
        print_board(session.snapshot(), session.renderer());

        let driver = async move {
            player.set_rate(rate);
            player.seek(from);
            player.play();
            tokio::time::sleep(wall).await;
            player.end();
        };

        let (_board, ()) = tokio::join!(session.run_with(notifications, print_board), driver);
        Ok(())
    })
}

fn print_board(snapshot: &BoardSnapshot, board: &AsciiBoard) {
    match &snapshot.last_move {
        Some(last) => println!(
            "t={:.2}s  move #{}: {} ({} -> {} at {:.2}s)",
            snapshot.time,
            snapshot.move_index.map_or(0, |i| i + 1),
            last.san,
            last.from,
            last.to,
            last.timestamp
        ),
        None => println!("t={:.2}s  no move yet", snapshot.time),
    }
    print!("{}", board.draw());
    println!();
}
