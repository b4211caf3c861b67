//! Turn-based Tetris runner (default binary).
//!
//! Modes:
//!
//! - no arguments: local demo, a random agent plays and every frame is drawn
//! - `--live`: play from the keyboard, see [`turn_tetris::keys`]
//! - `--remote`: agent side of the line protocol over stdin/stdout
//! - `--harness <program> [args...]`: run a game against an agent process
//!
//! Configuration comes from `TETRIS_*` environment variables, see
//! [`SessionConfig`].

use std::io;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tokio::process::Command;

use turn_tetris::adapter::{drive_game, run_agent, EventLog, SessionConfig};
use turn_tetris::core::{Game, RandomAgent};
use turn_tetris::keys::KeyboardAgent;
use turn_tetris::view::FrameWriter;

#[derive(Parser, Debug)]
#[command(name = "turn-tetris", about = "Turn-based Tetris simulation")]
struct Args {
    /// Play from the keyboard instead of the random agent
    #[arg(long, conflicts_with_all = ["remote", "harness"])]
    live: bool,

    /// Act as the agent side of the line protocol over stdin/stdout
    #[arg(long, conflicts_with = "harness")]
    remote: bool,

    /// Run a game against the agent process given as COMMAND
    #[arg(long, requires = "command")]
    harness: bool,

    /// Agent program and its arguments (with --harness)
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        requires = "harness"
    )]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = SessionConfig::from_env();

    if args.harness {
        // clap guarantees at least one value
        let (program, rest) = args
            .command
            .split_first()
            .context("--harness needs an agent program")?;
        run_harness(config, program, rest).await
    } else if args.remote {
        run_remote(config).await
    } else if args.live {
        run_live(config).await
    } else {
        run_local(config).await
    }
}

fn agent_for(config: &SessionConfig) -> RandomAgent {
    match config.game.seed {
        Some(seed) => RandomAgent::new(seed),
        None => RandomAgent::unseeded(),
    }
}

async fn run_local(config: SessionConfig) -> Result<()> {
    let mut game = Game::new(config.game);
    let mut agent = agent_for(&config);
    let log = config.event_log.clone().map(EventLog::spawn);
    let mut frames = FrameWriter::new(io::stdout());
    let frame_delay = Duration::from_millis(config.frame_ms);

    while let Some(event) = game.next_event(&mut agent) {
        if let Some(log) = log.as_ref() {
            log.record(&event);
        }

        if config.fast && event.actions.is_some() {
            continue;
        }

        frames.draw(&event.board, event.score)?;
        tokio::select! {
            _ = tokio::time::sleep(frame_delay) => {}
            _ = tokio::signal::ctrl_c() => {
                eprintln!("[Game] Interrupted");
                break;
            }
        }
    }

    if let Some(log) = log {
        log.close().await;
    }
    eprintln!(
        "[Game] Finished after {} pieces, score {}",
        game.pieces_dealt(),
        game.score()
    );
    Ok(())
}

/// Keyboard turns block on the terminal, so the whole game runs off the
/// runtime threads.
async fn run_live(config: SessionConfig) -> Result<()> {
    let mut game = Game::new(config.game);
    let log = config.event_log.clone().map(EventLog::spawn);

    let (game, log, result) = tokio::task::spawn_blocking(move || {
        let result = play_live(&mut game, log.as_ref());
        (game, log, result)
    })
    .await
    .context("live game task failed")?;

    if let Some(log) = log {
        log.close().await;
    }
    result?;
    eprintln!(
        "[Game] Finished after {} pieces, score {}",
        game.pieces_dealt(),
        game.score()
    );
    Ok(())
}

fn play_live(game: &mut Game, log: Option<&EventLog>) -> Result<()> {
    let mut agent = KeyboardAgent::new();
    let mut frames = FrameWriter::new(io::stdout());

    frames.enter()?;
    let result = live_loop(game, &mut agent, &mut frames, log);
    frames.exit()?;
    if agent.quit_requested() {
        eprintln!("[Game] Quit");
    }
    result
}

fn live_loop(
    game: &mut Game,
    agent: &mut KeyboardAgent,
    frames: &mut FrameWriter<io::Stdout>,
    log: Option<&EventLog>,
) -> Result<()> {
    while let Some(event) = game.next_event(agent) {
        if agent.quit_requested() {
            break;
        }
        if let Some(log) = log {
            log.record(&event);
        }
        frames.draw(&event.board, event.score)?;
    }
    Ok(())
}

async fn run_remote(config: SessionConfig) -> Result<()> {
    let mut agent = agent_for(&config);
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_agent(stdin, stdout, &mut agent).await?;
    Ok(())
}

async fn run_harness(config: SessionConfig, program: &str, args: &[String]) -> Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("cannot start agent {:?}", program))?;

    let stdin = child.stdin.take().context("agent stdin unavailable")?;
    let stdout = child.stdout.take().context("agent stdout unavailable")?;

    let mut game = Game::new(config.game);
    let log = config.event_log.clone().map(EventLog::spawn);
    let result = drive_game(&mut game, BufReader::new(stdout), stdin, log.as_ref()).await;

    if let Some(log) = log {
        log.close().await;
    }
    let score = result?;
    let status = child.wait().await?;
    eprintln!("[Harness] Agent exited with {}", status);
    println!("{}", score);
    Ok(())
}
