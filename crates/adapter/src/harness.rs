//! Harness side - drives a local [`Game`] against a remote agent
//!
//! Every event is forwarded as `U` (non-empty cell changes) or `L` (line
//! clears); every decision point sends `M` and waits for the reply. The remote
//! agent therefore sees exactly the state a local agent would.

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::core::{EventPayload, Game, GameEvent, Turn};
use crate::observe::EventLog;
use crate::protocol::{encode_lines, encode_update, parse_decision, INIT, MOVE, OK};
use crate::types::Action;

/// Line-level connection to a remote agent
pub struct RemoteAgent<R, W> {
    lines: Lines<R>,
    writer: W,
}

impl<R, W> RemoteAgent<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: reader.lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<String> {
        self.lines
            .next_line()
            .await?
            .context("agent closed the connection")
    }

    /// Send `INIT` and wait for `OK`
    pub async fn handshake(&mut self) -> Result<()> {
        self.send(INIT).await?;
        let reply = self.recv().await?;
        if reply.trim() != OK {
            bail!("handshake failed, expected {}, received {:?}", OK, reply);
        }
        Ok(())
    }

    /// Forward one event. Empty diffs are not sent.
    pub async fn forward(&mut self, event: &GameEvent) -> Result<()> {
        match &event.payload {
            EventPayload::LinesCleared { rows, .. } => {
                self.send(&encode_lines(event.score, rows)).await
            }
            EventPayload::Changes(changes) if changes.is_empty() => Ok(()),
            EventPayload::Changes(changes) => {
                let piece = event
                    .board
                    .piece()
                    .context("cell changes reported without an active piece")?;
                self.send(&encode_update(piece, changes)).await
            }
        }
    }

    /// Request a decision
    pub async fn request_move(&mut self) -> Result<Vec<Action>> {
        self.send(MOVE).await?;
        let reply = self.recv().await?;
        parse_decision(&reply).with_context(|| format!("bad decision reply: {:?}", reply))
    }

    /// Close the write half so the agent sees end of stream
    pub async fn shutdown(&mut self) -> Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

/// Play `game` to the end against the agent on the other side of
/// `reader`/`writer`. Returns the final score.
pub async fn drive_game<R, W>(
    game: &mut Game,
    reader: R,
    writer: W,
    log: Option<&EventLog>,
) -> Result<u32>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut remote = RemoteAgent::new(reader, writer);
    remote.handshake().await?;
    eprintln!("[Harness] Agent connected");

    loop {
        match game.step() {
            Turn::Event(event) => {
                if let Some(log) = log {
                    log.record(&event);
                }
                remote.forward(&event).await?;
            }
            Turn::AwaitingDecision => {
                let actions = remote.request_move().await?;
                let event = game.submit(actions);
                if let Some(log) = log {
                    log.record(&event);
                }
                remote.forward(&event).await?;
            }
            Turn::Finished => break,
        }
    }

    remote.shutdown().await?;
    eprintln!(
        "[Harness] Game over after {} pieces, score {}",
        game.pieces_dealt(),
        game.score()
    );
    Ok(game.score())
}
